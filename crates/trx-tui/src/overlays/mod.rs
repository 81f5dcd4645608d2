//! Modal overlays.
//!
//! An overlay temporarily takes over keyboard input. Each overlay owns its
//! state, key handler, and render function.

pub mod sources;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
pub use sources::SourcesOverlay;

/// Transition returned by overlay key handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTransition {
    Stay,
    Close,
}

/// The active overlay, if any.
#[derive(Debug)]
pub enum Overlay {
    Sources(SourcesOverlay),
}

impl Overlay {
    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayTransition {
        match self {
            Overlay::Sources(overlay) => overlay.handle_key(key),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::Sources(overlay) => overlay.render(frame, area),
        }
    }
}

/// Returns a centered rect of at most `width` x `height` within `area`.
pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
