//! Viewer application state.
//!
//! Split state: `ViewerState` holds the transcript and session-level flags;
//! the active overlay lives beside it in an `Option` so overlay handlers
//! and transcript handlers never fight over borrows.

use ratatui::layout::Rect;
use trx_core::config::Config;
use trx_core::session::Session;

use crate::overlays::Overlay;
use crate::transcript::TranscriptState;

/// All mutable state of one viewer run.
pub struct ViewerState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Transcript display state (cells, scroll, click routing).
    pub transcript: TranscriptState,
    /// Active modal overlay, if any.
    pub overlay: Option<Overlay>,
    /// Loaded configuration.
    pub config: Config,
    /// Session title for the status line.
    pub title: String,
    /// Whether follow mode is active (file watched for changes).
    pub follow: bool,
    /// Whether an update arrived that has not settled yet.
    pub streaming: bool,
    /// Transcript area from the last render, for mouse routing.
    pub transcript_area: Rect,
}

impl ViewerState {
    pub fn new(config: Config, session: &Session, follow: bool) -> Self {
        Self {
            should_quit: false,
            transcript: TranscriptState::from_session(session),
            overlay: None,
            config,
            title: session.display_title().to_string(),
            follow,
            streaming: false,
            transcript_area: Rect::default(),
        }
    }

    /// Label rendered above assistant messages, if enabled.
    pub fn assistant_label(&self) -> Option<&str> {
        self.config
            .viewer
            .show_model_info
            .then_some(self.config.viewer.assistant_label.as_str())
    }
}
