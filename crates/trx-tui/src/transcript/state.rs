//! Transcript display state: cells, scrolling, and click routing.

use trx_core::session::{Session, SourceRef};
use trx_core::transcript::SegmentId;

use super::cell::{CellLines, MessageCell};
use super::style::StyledLine;

/// Scroll mode for the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollMode {
    /// Auto-scroll to show latest content (bottom of transcript).
    FollowLatest,
    /// User scrolled manually; offset is a line index from the top.
    Anchored { offset: usize },
}

/// Scroll state for the transcript pane.
///
/// Offsets are clamped against the cached line count from the last render.
#[derive(Debug, Clone)]
pub struct ScrollState {
    pub mode: ScrollMode,
    pub cached_line_count: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            mode: ScrollMode::FollowLatest,
            cached_line_count: 0,
        }
    }
}

impl ScrollState {
    /// Returns the current scroll offset for rendering.
    pub fn offset(&self, viewport_height: usize) -> usize {
        let max_offset = self.cached_line_count.saturating_sub(viewport_height);
        match &self.mode {
            ScrollMode::FollowLatest => max_offset,
            ScrollMode::Anchored { offset } => (*offset).min(max_offset),
        }
    }

    pub fn scroll_up(&mut self, lines: usize, viewport_height: usize) {
        let offset = self.offset(viewport_height).saturating_sub(lines);
        self.mode = ScrollMode::Anchored { offset };
    }

    /// Scrolls down, re-entering follow mode at the bottom.
    pub fn scroll_down(&mut self, lines: usize, viewport_height: usize) {
        if self.mode == ScrollMode::FollowLatest {
            return;
        }
        let max_offset = self.cached_line_count.saturating_sub(viewport_height);
        let offset = (self.offset(viewport_height) + lines).min(max_offset);
        self.mode = if offset >= max_offset {
            ScrollMode::FollowLatest
        } else {
            ScrollMode::Anchored { offset }
        };
    }

    pub fn scroll_to_top(&mut self) {
        self.mode = ScrollMode::Anchored { offset: 0 };
    }

    pub fn scroll_to_bottom(&mut self) {
        self.mode = ScrollMode::FollowLatest;
    }

    pub fn page_up(&mut self, viewport_height: usize) {
        self.scroll_up(viewport_height.max(1), viewport_height);
    }

    pub fn page_down(&mut self, viewport_height: usize) {
        self.scroll_down(viewport_height.max(1), viewport_height);
    }
}

/// Per-line metadata from the last render, used to route mouse clicks.
#[derive(Debug, Clone, Copy)]
struct LineEntry {
    cell_index: usize,
    interaction: Option<SegmentId>,
}

/// Transcript display state.
///
/// Cells are rebuilt from the session on load and updated in place on
/// streaming changes (last-write-wins; a superseded update is just
/// overwritten by the next one). Rendering is a full pass per frame, which
/// the pure segmentation pipeline keeps cheap.
#[derive(Debug, Default)]
pub struct TranscriptState {
    cells: Vec<MessageCell>,
    pub scroll: ScrollState,
    pub viewport_height: usize,
    /// Line metadata rebuilt on every render.
    line_map: Vec<LineEntry>,
}

impl TranscriptState {
    pub fn from_session(session: &Session) -> Self {
        Self {
            cells: session.messages.iter().map(MessageCell::from_message).collect(),
            ..Self::default()
        }
    }

    pub fn cells(&self) -> &[MessageCell] {
        &self.cells
    }

    /// Applies a reloaded session snapshot.
    ///
    /// Existing cells absorb their new content in place so collapse state
    /// survives append-only streaming updates; new trailing messages become
    /// new cells with the last one marked streaming. A shrunken session is
    /// a structural change and rebuilds everything.
    pub fn apply_session(&mut self, session: &Session) {
        if session.messages.len() < self.cells.len() {
            self.cells = session.messages.iter().map(MessageCell::from_message).collect();
            self.scroll.scroll_to_bottom();
            return;
        }

        for (cell, message) in self.cells.iter_mut().zip(&session.messages) {
            cell.replace_content(&message.content, false);
        }

        let new_tail = &session.messages[self.cells.len()..];
        for message in new_tail {
            self.cells.push(MessageCell::from_message(message));
        }

        // The last assistant cell is the one still receiving content.
        if let Some(MessageCell::Assistant { is_streaming, .. }) = self
            .cells
            .iter_mut()
            .rev()
            .find(|c| matches!(c, MessageCell::Assistant { .. }))
        {
            *is_streaming = true;
        }
    }

    /// Marks every streaming cell as settled.
    pub fn settle(&mut self) {
        for cell in &mut self.cells {
            cell.finalize();
        }
    }

    /// Renders all cells and rebuilds the line map.
    ///
    /// Returns the full line list; the caller slices it by scroll offset.
    pub fn build_lines(&mut self, width: usize, assistant_label: Option<&str>) -> Vec<StyledLine> {
        let mut lines = Vec::new();
        self.line_map.clear();

        for (cell_index, cell) in self.cells.iter().enumerate() {
            let CellLines {
                lines: cell_lines,
                interactions,
            } = cell.display_lines(width, assistant_label);

            for (line, interaction) in cell_lines.into_iter().zip(interactions) {
                self.line_map.push(LineEntry {
                    cell_index,
                    interaction,
                });
                lines.push(line);
            }

            // Blank separator between cells, tracked in the map too.
            self.line_map.push(LineEntry {
                cell_index,
                interaction: None,
            });
            lines.push(StyledLine::empty());
        }

        self.scroll.cached_line_count = lines.len();
        lines
    }

    /// Toggles the tool segment whose header sits at the given transcript
    /// line. Returns true if a toggle happened.
    pub fn toggle_segment_for_line(&mut self, line: usize) -> bool {
        let Some(entry) = self.line_map.get(line).copied() else {
            return false;
        };
        let Some(id) = entry.interaction else {
            return false;
        };
        let toggled = self
            .cells
            .get_mut(entry.cell_index)
            .is_some_and(|cell| cell.toggle_segment(id));
        if toggled {
            tracing::debug!(line, ?id, "toggled tool segment");
        }
        toggled
    }

    /// Sources of the last assistant message, for the sources overlay.
    pub fn last_assistant_sources(&self) -> &[SourceRef] {
        self.cells
            .iter()
            .rev()
            .find(|c| matches!(c, MessageCell::Assistant { .. }))
            .map(MessageCell::sources)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use trx_core::session::{Message, Session};
    use trx_core::transcript::{TOOL_END, TOOL_START};

    use super::*;

    fn session_with(contents: &[(&str, bool)]) -> Session {
        Session {
            messages: contents
                .iter()
                .map(|(text, is_user)| {
                    if *is_user {
                        Message::user(*text)
                    } else {
                        Message::assistant(*text)
                    }
                })
                .collect(),
            ..Session::default()
        }
    }

    #[test]
    fn build_lines_covers_all_cells() {
        let session = session_with(&[("hi", true), ("hello back", false)]);
        let mut state = TranscriptState::from_session(&session);
        let lines = state.build_lines(80, Some("Assistant"));

        let text: String = lines.iter().map(StyledLine::text).collect::<Vec<_>>().join("\n");
        assert!(text.contains("hi"));
        assert!(text.contains("hello back"));
        assert_eq!(state.scroll.cached_line_count, lines.len());
    }

    #[test]
    fn click_on_header_line_toggles() {
        let content = format!("{TOOL_START}\nUsing tool: read\n{TOOL_END}");
        let session = session_with(&[(content.as_str(), false)]);
        let mut state = TranscriptState::from_session(&session);

        let lines = state.build_lines(80, None);
        let header_line = lines
            .iter()
            .position(|l| l.text().contains("Using tool: read"))
            .unwrap();

        assert!(state.toggle_segment_for_line(header_line));
        let text: String = state
            .build_lines(80, None)
            .iter()
            .map(StyledLine::text)
            .collect();
        assert!(text.contains('▶'));

        // Clicking a non-header line does nothing.
        assert!(!state.toggle_segment_for_line(usize::MAX));
    }

    #[test]
    fn apply_session_appends_and_marks_streaming() {
        let session = session_with(&[("q", true), ("partial", false)]);
        let mut state = TranscriptState::from_session(&session);

        let grown = session_with(&[("q", true), ("partial answer grows", false)]);
        state.apply_session(&grown);

        let text: String = state
            .build_lines(80, None)
            .iter()
            .map(StyledLine::text)
            .collect();
        assert!(text.contains("partial answer grows"));
        assert!(text.contains('▌'));

        state.settle();
        let text: String = state
            .build_lines(80, None)
            .iter()
            .map(StyledLine::text)
            .collect();
        assert!(!text.contains('▌'));
    }

    #[test]
    fn scroll_clamps_and_follows() {
        let mut scroll = ScrollState::default();
        scroll.cached_line_count = 100;

        assert_eq!(scroll.offset(20), 80);

        scroll.scroll_up(10, 20);
        assert_eq!(scroll.offset(20), 70);

        scroll.scroll_down(1000, 20);
        assert_eq!(scroll.mode, ScrollMode::FollowLatest);

        scroll.scroll_to_top();
        assert_eq!(scroll.offset(20), 0);

        scroll.page_down(20);
        assert_eq!(scroll.offset(20), 20);
    }
}
