//! Source-citation overlay.
//!
//! Lists the sources attached to an assistant message. Enter opens one
//! source (content plus URL when present), Esc or Backspace returns to the
//! list, Esc from the list closes the overlay. Source content is displayed
//! verbatim; this overlay never parses it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use trx_core::session::SourceRef;

use super::{OverlayTransition, centered_rect};
use crate::transcript::text::truncate_with_ellipsis;

#[derive(Debug)]
pub struct SourcesOverlay {
    sources: Vec<SourceRef>,
    selected: usize,
    /// Index of the source shown in detail view, if any.
    detail: Option<usize>,
}

impl SourcesOverlay {
    pub fn open(sources: Vec<SourceRef>) -> Self {
        Self {
            sources,
            selected: 0,
            detail: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayTransition {
        let ctrl_c =
            key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl_c {
            return OverlayTransition::Close;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Backspace => {
                if self.detail.take().is_some() {
                    OverlayTransition::Stay
                } else {
                    OverlayTransition::Close
                }
            }
            KeyCode::Char('q') if self.detail.is_none() => OverlayTransition::Close,
            KeyCode::Up | KeyCode::Char('k') if self.detail.is_none() => {
                self.selected = self.selected.saturating_sub(1);
                OverlayTransition::Stay
            }
            KeyCode::Down | KeyCode::Char('j') if self.detail.is_none() => {
                if self.selected + 1 < self.sources.len() {
                    self.selected += 1;
                }
                OverlayTransition::Stay
            }
            KeyCode::Enter if self.detail.is_none() && !self.sources.is_empty() => {
                self.detail = Some(self.selected);
                OverlayTransition::Stay
            }
            _ => OverlayTransition::Stay,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(8).clamp(30, 90);
        let height = area.height.saturating_sub(4).clamp(8, 24);
        let overlay_area = centered_rect(area, width, height);

        frame.render_widget(Clear, overlay_area);

        match self.detail {
            Some(index) => self.render_detail(frame, overlay_area, index),
            None => self.render_list(frame, overlay_area),
        }
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" Sources ({}) ", self.sources.len()))
            .title_bottom(" ↑↓ navigate · Enter open · Esc close ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.sources.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No sources attached to this message",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
            frame.render_widget(empty, inner);
            return;
        }

        let preview_width = inner.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = self
            .sources
            .iter()
            .map(|source| {
                let preview = source.content.split_whitespace().collect::<Vec<_>>().join(" ");
                ListItem::new(Line::from(truncate_with_ellipsis(&preview, preview_width)))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(Color::Cyan)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));
        frame.render_stateful_widget(list, inner, &mut list_state);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, index: usize) {
        let Some(source) = self.sources.get(index) else {
            return;
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" Source {}/{} ", index + 1, self.sources.len()))
            .title_bottom(" Esc back to sources ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = source
            .content
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect();
        if let Some(url) = source.metadata.url.as_deref() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                url.to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::UNDERLINED),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);
    }
}
