mod screen;
mod view;

pub use screen::draw_progress_overlay;
pub use view::{
    overlay_action_from_key, project_progress_view_model, status_glyph, OverlayAction,
    ProgressOverlayViewModel, StageRow,
};
