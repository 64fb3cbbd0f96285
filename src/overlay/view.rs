use crate::save::{StageStatus, StageTracker};
use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

/// One rendered stage line. Purely presentational; all transitions happen in
/// the orchestrator's tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRow {
    pub label: String,
    pub status: StageStatus,
    pub glyph: &'static str,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressOverlayViewModel {
    pub title: String,
    pub rows: Vec<StageRow>,
    pub banner: Option<String>,
    pub close_enabled: bool,
    pub hint_text: String,
}

pub fn status_glyph(status: StageStatus) -> &'static str {
    match status {
        StageStatus::NotStarted => "·",
        StageStatus::InProgress => "…",
        StageStatus::Success => "✔",
        StageStatus::Error => "✘",
        StageStatus::Aborted => "–",
    }
}

pub fn project_progress_view_model(
    title: &str,
    tracker: &StageTracker,
    banner: Option<String>,
) -> ProgressOverlayViewModel {
    let close_enabled = tracker.is_settled();
    ProgressOverlayViewModel {
        title: title.to_string(),
        rows: tracker
            .records()
            .iter()
            .map(|record| StageRow {
                label: record.label.clone(),
                status: record.status,
                glyph: status_glyph(record.status),
                detail: record.detail.clone(),
            })
            .collect(),
        banner,
        close_enabled,
        hint_text: if close_enabled {
            "Enter close | Esc close".to_string()
        } else {
            "Saving, please wait".to_string()
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    Close,
}

pub fn overlay_action_from_key(
    close_enabled: bool,
    key: crossterm::event::KeyEvent,
) -> Option<OverlayAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(OverlayAction::Close);
    }
    if !close_enabled {
        return None;
    }
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('\n') | KeyCode::Char('\r') => {
            Some(OverlayAction::Close)
        }
        _ => None,
    }
}
