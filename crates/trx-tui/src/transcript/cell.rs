//! Message cells and their display-line rendering.
//!
//! Each cell renders into UI-agnostic styled lines for a given width.
//! Assistant content is segmented on every render (the segmenter is cheap
//! and pure), so a streaming transcript that is replaced wholesale just
//! re-renders; trailing unterminated tool blocks stay invisible until their
//! end marker arrives.

use trx_core::session::{Message, Metrics, Role, SourceRef};
use trx_core::transcript::{
    Segment, SegmentId, SegmentKind, decode_tool_call, decode_tool_response, segment,
};
use unicode_width::UnicodeWidthStr;

use super::collapse::CollapseState;
use super::markdown::render_prose;
use super::style::{Style, StyledLine, StyledSpan};
use super::text::sanitize_for_display;
use super::wrap::wrap_chars;

/// Shown in place of an empty tool-response body. A deliberate user-visible
/// signal that the tool produced nothing, distinct from a rendering bug.
const EMPTY_RESPONSE_PLACEHOLDER: &str = "No tool response content found";

/// Disclosure indicators on tool card headers.
const DISCLOSURE_EXPANDED: char = '▼';
const DISCLOSURE_COLLAPSED: char = '▶';

/// Indent for expanded card bodies.
const CARD_INDENT: &str = "  ";

/// Rendered lines of one cell plus per-line click metadata.
///
/// `interactions` is aligned with `lines`; a `Some(id)` marks a tool card
/// header whose click toggles that segment.
#[derive(Debug, Clone, Default)]
pub struct CellLines {
    pub lines: Vec<StyledLine>,
    pub interactions: Vec<Option<SegmentId>>,
}

impl CellLines {
    fn push(&mut self, line: StyledLine) {
        self.lines.push(line);
        self.interactions.push(None);
    }

    fn push_header(&mut self, line: StyledLine, id: SegmentId) {
        self.lines.push(line);
        self.interactions.push(Some(id));
    }
}

/// A logical unit in the transcript: one message of the session.
#[derive(Debug, Clone)]
pub enum MessageCell {
    User {
        content: String,
    },
    Assistant {
        /// Full raw turn content, tool markers included. Replaced wholesale
        /// on streaming updates.
        content: String,
        is_streaming: bool,
        trace_id: Option<String>,
        sources: Vec<SourceRef>,
        metrics: Option<Metrics>,
        /// Expand/collapse flags for this message's tool segments. The one
        /// mutable piece of the rendering pipeline, owned here so its
        /// lifetime matches the rendering context of this message.
        collapse: CollapseState,
    },
}

impl MessageCell {
    /// Builds a cell from a session message.
    pub fn from_message(message: &Message) -> Self {
        match message.role {
            Role::User => MessageCell::User {
                content: message.content.clone(),
            },
            Role::Assistant => MessageCell::Assistant {
                content: message.content.clone(),
                is_streaming: false,
                trace_id: message.trace_id.clone(),
                sources: message.sources.clone(),
                metrics: message.metrics,
                collapse: CollapseState::new(),
            },
        }
    }

    /// Returns the sources attached to this cell.
    pub fn sources(&self) -> &[SourceRef] {
        match self {
            MessageCell::User { .. } => &[],
            MessageCell::Assistant { sources, .. } => sources,
        }
    }

    /// Replaces assistant content in place, keeping collapse state when the
    /// update only appends (segment indices stay stable then) and resetting
    /// it otherwise. No-op on user cells.
    pub fn replace_content(&mut self, new_content: &str, streaming: bool) {
        if let MessageCell::Assistant {
            content,
            is_streaming,
            collapse,
            ..
        } = self
        {
            if !new_content.starts_with(content.as_str()) {
                *collapse = CollapseState::new();
            }
            new_content.clone_into(content);
            *is_streaming = streaming;
        }
    }

    /// Marks a streaming assistant cell as settled.
    pub fn finalize(&mut self) {
        if let MessageCell::Assistant { is_streaming, .. } = self {
            *is_streaming = false;
        }
    }

    /// Toggles one tool segment of this cell. Returns false for user cells.
    pub fn toggle_segment(&mut self, id: SegmentId) -> bool {
        match self {
            MessageCell::Assistant { collapse, .. } => {
                collapse.toggle(id);
                true
            }
            MessageCell::User { .. } => false,
        }
    }

    /// Renders this cell into display lines for the given width.
    ///
    /// `label` is the optional assistant header line. Pure: the same cell
    /// state and width always produce the same lines.
    pub fn display_lines(&self, width: usize, label: Option<&str>) -> CellLines {
        match self {
            MessageCell::User { content } => render_user(content, width),
            MessageCell::Assistant {
                content,
                is_streaming,
                trace_id,
                metrics,
                collapse,
                ..
            } => {
                let mut out = CellLines::default();

                if let Some(label) = label {
                    out.push(assistant_label_line(label, trace_id.as_deref()));
                }

                let segments = segment(content);
                let body_width = width.saturating_sub(CARD_INDENT.len()).max(10);

                for (i, seg) in segments.iter().enumerate() {
                    if i > 0 {
                        out.push(StyledLine::empty());
                    }
                    match seg.kind {
                        SegmentKind::Prose => {
                            for line in render_prose(&seg.raw, width) {
                                out.push(line);
                            }
                        }
                        SegmentKind::ToolCall => {
                            render_tool_call(&mut out, seg, collapse, body_width);
                        }
                        SegmentKind::ToolResponse => {
                            render_tool_response(&mut out, seg, collapse, body_width);
                        }
                    }
                }

                if *is_streaming {
                    if out.lines.is_empty() {
                        out.push(StyledLine::empty());
                    }
                    if let Some(last) = out.lines.last_mut() {
                        last.spans
                            .push(StyledSpan::new("▌", Style::StreamingCursor));
                    }
                } else if let Some(text) = metrics.and_then(|m| m.display()) {
                    out.push(StyledLine::empty());
                    out.push(StyledLine {
                        spans: vec![StyledSpan::new(text, Style::Metrics)],
                    });
                }

                out
            }
        }
    }
}

fn assistant_label_line(label: &str, trace_id: Option<&str>) -> StyledLine {
    let mut spans = vec![StyledSpan::new(label, Style::AssistantLabel)];
    // The trace link depends on ambient config; until that resolves the
    // link is simply omitted.
    if let Some(url) = trace_id.and_then(trx_core::trace::build_url) {
        spans.push(StyledSpan::new("  ", Style::Plain));
        spans.push(StyledSpan::new(format!("trace: {url}"), Style::TraceLink));
    }
    StyledLine { spans }
}

fn render_user(content: &str, width: usize) -> CellLines {
    let mut out = CellLines::default();
    let prefix = "│ ";
    let content_width = width.saturating_sub(prefix.width()).max(10);

    for raw_line in content.lines() {
        let safe = sanitize_for_display(raw_line);
        for part in wrap_chars(&safe, content_width) {
            out.push(StyledLine {
                spans: vec![
                    StyledSpan::new(prefix, Style::UserPrefix),
                    StyledSpan::new(part, Style::User),
                ],
            });
        }
    }
    if out.lines.is_empty() {
        out.push(StyledLine {
            spans: vec![StyledSpan::new(prefix, Style::UserPrefix)],
        });
    }
    out
}

fn header_line(title: &str, expanded: bool) -> StyledLine {
    let disclosure = if expanded {
        DISCLOSURE_EXPANDED
    } else {
        DISCLOSURE_COLLAPSED
    };
    StyledLine {
        spans: vec![
            StyledSpan::new(format!("{disclosure} "), Style::ToolDisclosure),
            StyledSpan::new(title, Style::ToolHeader),
        ],
    }
}

fn push_card_row(out: &mut CellLines, text: String, style: Style) {
    out.push(StyledLine {
        spans: vec![
            StyledSpan::new(CARD_INDENT, Style::Plain),
            StyledSpan::new(text, style),
        ],
    });
}

fn push_raw_rows(out: &mut CellLines, text: &str, width: usize, style: Style) {
    for raw_line in text.lines() {
        let safe = sanitize_for_display(raw_line);
        for part in wrap_chars(&safe, width) {
            push_card_row(out, part, style);
        }
    }
}

fn render_tool_call(out: &mut CellLines, seg: &Segment, collapse: &CollapseState, width: usize) {
    let record = decode_tool_call(seg.body());
    let expanded = collapse.is_expanded(seg.id());

    out.push_header(header_line(&record.title, expanded), seg.id());
    if !expanded {
        return;
    }

    if let Some(name) = &record.tool_name {
        push_card_row(out, format!("Tool: {name}"), Style::ToolName);
    }

    // Arguments stay verbatim: re-serializing would mangle partially
    // streamed or malformed JSON.
    if let Some(args) = record.arguments.as_deref().map(str::trim)
        && !args.is_empty()
    {
        push_card_row(out, "Arguments:".to_string(), Style::ToolSectionLabel);
        push_raw_rows(out, args, width, Style::ToolOutput);
    }
}

fn render_tool_response(
    out: &mut CellLines,
    seg: &Segment,
    collapse: &CollapseState,
    width: usize,
) {
    let record = decode_tool_response(seg.body());
    let expanded = collapse.is_expanded(seg.id());

    out.push_header(header_line(&record.title, expanded), seg.id());
    if !expanded {
        return;
    }

    if record.output.is_empty() {
        push_card_row(out, EMPTY_RESPONSE_PLACEHOLDER.to_string(), Style::Placeholder);
    } else {
        push_raw_rows(out, &record.output, width, Style::ToolOutput);
    }
}

#[cfg(test)]
mod tests {
    use trx_core::transcript::{TOOL_END, TOOL_RESPONSE_END, TOOL_RESPONSE_START, TOOL_START};

    use super::*;

    fn assistant(content: &str) -> MessageCell {
        MessageCell::from_message(&Message::assistant(content))
    }

    fn all_text(lines: &CellLines) -> String {
        lines
            .lines
            .iter()
            .map(StyledLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn prose_only_renders_markdown() {
        let cell = assistant("Hello **world**");
        let lines = cell.display_lines(80, None);
        assert!(all_text(&lines).contains("world"));
        assert!(lines.interactions.iter().all(Option::is_none));
    }

    #[test]
    fn tool_call_header_is_clickable() {
        let content =
            format!("{TOOL_START}\nUsing tool: read\n\nTool: read\n\nArguments:\n{{}}\n{TOOL_END}");
        let cell = assistant(&content);
        let lines = cell.display_lines(80, None);

        let header_count = lines.interactions.iter().flatten().count();
        assert_eq!(header_count, 1);
        assert!(all_text(&lines).contains("Using tool: read"));
        assert!(all_text(&lines).contains("Tool: read"));
    }

    #[test]
    fn collapsed_card_hides_body() {
        let content = format!(
            "{TOOL_START}\nUsing tool: read\n\nTool: read\n\nArguments:\n{{\"path\": \"x\"}}\n{TOOL_END}"
        );
        let mut cell = assistant(&content);

        let id = lines_header_id(&cell);
        cell.toggle_segment(id);

        let lines = cell.display_lines(80, None);
        let text = all_text(&lines);
        assert!(text.contains('▶'));
        assert!(!text.contains("Arguments:"));
        assert!(!text.contains("path"));
    }

    fn lines_header_id(cell: &MessageCell) -> SegmentId {
        cell.display_lines(80, None)
            .interactions
            .iter()
            .flatten()
            .copied()
            .next()
            .unwrap()
    }

    #[test]
    fn empty_response_shows_placeholder() {
        let content = format!("{TOOL_RESPONSE_START}\nResponse\n\n{TOOL_RESPONSE_END}");
        let cell = assistant(&content);
        let text = all_text(&cell.display_lines(80, None));
        assert!(text.contains(EMPTY_RESPONSE_PLACEHOLDER));
    }

    #[test]
    fn response_output_rendered_verbatim_lines() {
        let content =
            format!("{TOOL_RESPONSE_START}\nTool response:\n\nline one\nline two\n{TOOL_RESPONSE_END}");
        let cell = assistant(&content);
        let text = all_text(&cell.display_lines(80, None));
        assert!(text.contains("line one"));
        assert!(text.contains("line two"));
    }

    #[test]
    fn segment_order_is_preserved_in_output() {
        let content = format!(
            "first\n{TOOL_START}\nCall\n{TOOL_END}\nmiddle\n{TOOL_RESPONSE_START}\nResp\n\nout\n{TOOL_RESPONSE_END}\nlast"
        );
        let cell = assistant(&content);
        let text = all_text(&cell.display_lines(80, None));

        let first = text.find("first").unwrap();
        let call = text.find("Call").unwrap();
        let middle = text.find("middle").unwrap();
        let resp = text.find("Resp").unwrap();
        let last = text.find("last").unwrap();
        assert!(first < call && call < middle && middle < resp && resp < last);
    }

    #[test]
    fn unterminated_block_not_rendered() {
        let content = format!("before{TOOL_START}\nUsing tool: read\npartial");
        let cell = assistant(&content);
        let text = all_text(&cell.display_lines(80, None));
        assert!(text.contains("before"));
        assert!(!text.contains("partial"));
        assert!(!text.contains("Using tool"));
    }

    #[test]
    fn streaming_cell_shows_cursor() {
        let mut cell = assistant("");
        cell.replace_content("partial text", true);
        let text = all_text(&cell.display_lines(80, None));
        assert!(text.contains('▌'));

        cell.finalize();
        let text = all_text(&cell.display_lines(80, None));
        assert!(!text.contains('▌'));
    }

    #[test]
    fn append_keeps_collapse_state() {
        let block = format!("{TOOL_START}\nCall\n{TOOL_END}");
        let mut cell = assistant(&block);
        let id = lines_header_id(&cell);
        cell.toggle_segment(id);

        let appended = format!("{block}\nmore prose");
        cell.replace_content(&appended, true);

        let lines = cell.display_lines(80, None);
        assert!(all_text(&lines).contains('▶'));
    }

    #[test]
    fn structural_change_resets_collapse_state() {
        let mut cell = assistant(&format!("{TOOL_START}\nCall\n{TOOL_END}"));
        let id = lines_header_id(&cell);
        cell.toggle_segment(id);

        cell.replace_content("entirely different transcript", false);
        cell.replace_content(
            &format!("entirely different transcript\n{TOOL_START}\nCall\n{TOOL_END}"),
            false,
        );

        let lines = cell.display_lines(80, None);
        assert!(all_text(&lines).contains('▼'));
    }

    #[test]
    fn user_cell_gets_prefix() {
        let cell = MessageCell::from_message(&Message::user("hi there"));
        let lines = cell.display_lines(80, None);
        assert!(lines.lines[0].text().starts_with("│ "));
    }

    #[test]
    fn metrics_line_rendered_when_settled() {
        let mut message = Message::assistant("done");
        message.metrics = Some(Metrics {
            time_to_first_token: Some(0.4),
            total_time: Some(1.5),
        });
        let cell = MessageCell::from_message(&message);
        let text = all_text(&cell.display_lines(80, None));
        assert!(text.contains("0.40s to first token + 1.50s"));
    }
}
