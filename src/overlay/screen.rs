use crate::overlay::view::ProgressOverlayViewModel;
use crate::save::StageStatus;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph};
use ratatui::Frame;

fn status_color(status: StageStatus) -> Color {
    match status {
        StageStatus::NotStarted => Color::DarkGray,
        StageStatus::InProgress => Color::Yellow,
        StageStatus::Success => Color::Green,
        StageStatus::Error => Color::Red,
        StageStatus::Aborted => Color::DarkGray,
    }
}

pub fn draw_progress_overlay(frame: &mut Frame<'_>, view_model: &ProgressOverlayViewModel) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(Span::styled(
        view_model.title.clone(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let mut items = Vec::with_capacity(view_model.rows.len());
    for row in &view_model.rows {
        let mut spans = vec![
            Span::styled(
                format!("{} ", row.glyph),
                Style::default().fg(status_color(row.status)),
            ),
            Span::raw(row.label.clone()),
        ];
        if let Some(detail) = &row.detail {
            spans.push(Span::styled(
                format!("  {detail}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        items.push(ListItem::new(Line::from(spans)));
    }
    frame.render_widget(
        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .padding(Padding::new(2, 2, 1, 1)),
        ),
        chunks[1],
    );

    let mut footer_lines = Vec::new();
    if let Some(banner) = &view_model.banner {
        footer_lines.push(Line::from(Span::styled(
            banner.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    footer_lines.push(Line::from(view_model.hint_text.clone()));
    let footer = Paragraph::new(footer_lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
