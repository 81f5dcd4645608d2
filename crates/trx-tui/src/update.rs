//! Event handling: keyboard, mouse, and inbox events.
//!
//! All handlers are synchronous state mutations; one event is processed at
//! a time, so a toggle can never interleave with a transcript update.

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::events::ViewerEvent;
use crate::overlays::{Overlay, OverlayTransition, SourcesOverlay};
use crate::state::ViewerState;

/// Lines to scroll per mouse wheel tick.
const MOUSE_SCROLL_LINES: usize = 3;

/// Handles a key event.
pub fn handle_key(state: &mut ViewerState, key: KeyEvent) {
    // Overlays capture the keyboard while open.
    if let Some(overlay) = state.overlay.as_mut() {
        if overlay.handle_key(key) == OverlayTransition::Close {
            state.overlay = None;
        }
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let viewport = state.transcript.viewport_height;

    match key.code {
        KeyCode::Char('c') if ctrl => state.should_quit = true,
        KeyCode::Char('q') | KeyCode::Esc => state.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => state.transcript.scroll.scroll_up(1, viewport),
        KeyCode::Down | KeyCode::Char('j') => state.transcript.scroll.scroll_down(1, viewport),
        KeyCode::PageUp => state.transcript.scroll.page_up(viewport),
        KeyCode::PageDown => state.transcript.scroll.page_down(viewport),
        KeyCode::Home | KeyCode::Char('g') => state.transcript.scroll.scroll_to_top(),
        KeyCode::End | KeyCode::Char('G') => state.transcript.scroll.scroll_to_bottom(),
        KeyCode::Char('s') => {
            let sources = state.transcript.last_assistant_sources().to_vec();
            state.overlay = Some(Overlay::Sources(SourcesOverlay::open(sources)));
        }
        _ => {}
    }
}

/// Handles a mouse event over the transcript area.
pub fn handle_mouse(state: &mut ViewerState, mouse: MouseEvent) {
    if state.overlay.is_some() {
        return;
    }

    let viewport = state.transcript.viewport_height;
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            state.transcript.scroll.scroll_up(MOUSE_SCROLL_LINES, viewport);
        }
        MouseEventKind::ScrollDown => {
            state
                .transcript
                .scroll
                .scroll_down(MOUSE_SCROLL_LINES, viewport);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(line) = screen_to_transcript_line(state, mouse.column, mouse.row) {
                state.transcript.toggle_segment_for_line(line);
            }
        }
        _ => {}
    }
}

/// Converts screen coordinates to a transcript line index.
///
/// Returns `None` outside the transcript area.
fn screen_to_transcript_line(state: &ViewerState, column: u16, row: u16) -> Option<usize> {
    let area = state.transcript_area;
    if column < area.x
        || column >= area.x + area.width
        || row < area.y
        || row >= area.y + area.height
    {
        return None;
    }

    let offset = state.transcript.scroll.offset(area.height as usize);
    Some(offset + (row - area.y) as usize)
}

/// Applies an inbox event from the follow watcher.
pub fn handle_viewer_event(state: &mut ViewerState, event: ViewerEvent) {
    match event {
        ViewerEvent::SessionUpdated(session) => {
            tracing::debug!(messages = session.messages.len(), "session file changed");
            state.transcript.apply_session(&session);
            state.streaming = true;
        }
        ViewerEvent::StreamSettled => {
            state.transcript.settle();
            state.streaming = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;
    use trx_core::config::Config;
    use trx_core::session::{Message, Session};

    use super::*;

    fn state_with(messages: Vec<Message>) -> ViewerState {
        let session = Session {
            messages,
            ..Session::default()
        };
        ViewerState::new(Config::default(), &session, false)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn q_quits() {
        let mut state = state_with(vec![]);
        handle_key(&mut state, key(KeyCode::Char('q')));
        assert!(state.should_quit);
    }

    #[test]
    fn s_opens_sources_overlay_and_esc_closes_it() {
        let mut state = state_with(vec![Message::assistant("hello")]);

        handle_key(&mut state, key(KeyCode::Char('s')));
        assert!(state.overlay.is_some());

        // Keys go to the overlay while it is open.
        handle_key(&mut state, key(KeyCode::Esc));
        assert!(state.overlay.is_none());
        assert!(!state.should_quit);
    }

    #[test]
    fn session_update_marks_streaming_and_settle_clears_it() {
        let mut state = state_with(vec![Message::assistant("a")]);

        let grown = Session {
            messages: vec![Message::assistant("a longer")],
            ..Session::default()
        };
        handle_viewer_event(&mut state, ViewerEvent::SessionUpdated(grown));
        assert!(state.streaming);

        handle_viewer_event(&mut state, ViewerEvent::StreamSettled);
        assert!(!state.streaming);
    }

    #[test]
    fn click_outside_transcript_area_is_ignored() {
        let mut state = state_with(vec![Message::assistant("a")]);
        state.transcript_area = Rect::new(0, 0, 80, 20);
        assert_eq!(screen_to_transcript_line(&state, 5, 25), None);
        assert_eq!(screen_to_transcript_line(&state, 5, 5), Some(5));
    }
}
