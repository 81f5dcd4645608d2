//! Frame rendering: styled lines to ratatui, layout, status line.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::state::ViewerState;
use crate::transcript::{Style as TranscriptStyle, StyledLine};

/// Renders one frame.
pub fn render(frame: &mut Frame, state: &mut ViewerState) {
    let [transcript_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    render_transcript(frame, state, transcript_area);
    render_status_line(frame, state, status_area);

    if let Some(overlay) = &state.overlay {
        overlay.render(frame, transcript_area);
    }
}

fn render_transcript(frame: &mut Frame, state: &mut ViewerState, area: Rect) {
    state.transcript_area = area;
    state.transcript.viewport_height = area.height as usize;

    let label = state.assistant_label().map(str::to_string);
    let all_lines = state
        .transcript
        .build_lines(area.width as usize, label.as_deref());

    let offset = state.transcript.scroll.offset(area.height as usize);
    let visible: Vec<Line<'static>> = all_lines
        .into_iter()
        .skip(offset)
        .take(area.height as usize)
        .map(convert_styled_line)
        .collect();

    frame.render_widget(Paragraph::new(visible), area);
}

fn render_status_line(frame: &mut Frame, state: &ViewerState, area: Rect) {
    let mut left = vec![Span::styled(
        format!(" {} ", state.title),
        Style::default().fg(Color::Black).bg(Color::Cyan),
    )];
    if state.streaming {
        left.push(Span::styled(
            " streaming… ",
            Style::default().fg(Color::Yellow),
        ));
    } else if state.follow {
        left.push(Span::styled(
            " following ",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let hints = "click header: fold · s: sources · q: quit ";
    let left_width: usize = left.iter().map(Span::width).sum();
    let pad = (area.width as usize)
        .saturating_sub(left_width)
        .saturating_sub(hints.width());
    left.push(Span::raw(" ".repeat(pad)));
    left.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));

    frame.render_widget(Paragraph::new(Line::from(left)), area);
}

/// Converts a transcript StyledLine to a ratatui Line.
fn convert_styled_line(styled_line: StyledLine) -> Line<'static> {
    let spans: Vec<Span<'static>> = styled_line
        .spans
        .into_iter()
        .map(|s| Span::styled(s.text, convert_style(s.style)))
        .collect();
    Line::from(spans)
}

/// Converts a semantic transcript style to a terminal style.
fn convert_style(style: TranscriptStyle) -> Style {
    match style {
        TranscriptStyle::Plain => Style::default(),
        TranscriptStyle::UserPrefix => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        TranscriptStyle::User => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::ITALIC),
        TranscriptStyle::Assistant => Style::default().fg(Color::White),
        TranscriptStyle::AssistantLabel => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        TranscriptStyle::StreamingCursor => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::SLOW_BLINK),
        TranscriptStyle::ToolHeader => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        TranscriptStyle::ToolDisclosure => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::DIM),
        TranscriptStyle::ToolName => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        TranscriptStyle::ToolSectionLabel => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::DIM),
        TranscriptStyle::ToolOutput => Style::default().fg(Color::DarkGray),
        TranscriptStyle::Placeholder => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        TranscriptStyle::TraceLink => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::UNDERLINED),
        TranscriptStyle::Metrics => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM | Modifier::ITALIC),

        // Markdown styles
        TranscriptStyle::CodeInline | TranscriptStyle::CodeBlock => {
            Style::default().fg(Color::Cyan)
        }
        TranscriptStyle::CodeFence => Style::default().fg(Color::DarkGray),
        TranscriptStyle::Emphasis => Style::default().add_modifier(Modifier::ITALIC),
        TranscriptStyle::Strong => Style::default().add_modifier(Modifier::BOLD),
        TranscriptStyle::H1 => Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        TranscriptStyle::H2 => Style::default().add_modifier(Modifier::BOLD),
        TranscriptStyle::H3 => Style::default()
            .add_modifier(Modifier::ITALIC)
            .fg(Color::White),
        TranscriptStyle::Link => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::UNDERLINED),
        TranscriptStyle::BlockQuote => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::ITALIC),
        TranscriptStyle::ListBullet | TranscriptStyle::ListNumber => {
            Style::default().fg(Color::Yellow)
        }
    }
}
