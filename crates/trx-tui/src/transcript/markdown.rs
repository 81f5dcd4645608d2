//! Markdown rendering for prose segments.
//!
//! Parses GitHub-flavored markdown (tables, strikethrough, task lists) with
//! pulldown-cmark and converts the event stream to styled lines. Tables go
//! through comfy-table. HTML events are skipped so transcript content cannot
//! inject terminal escapes through the markdown path.

use std::panic::{AssertUnwindSafe, catch_unwind};

use comfy_table::{ContentArrangement, Table};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use unicode_width::UnicodeWidthStr;

use super::style::{Style, StyledLine, StyledSpan};
use super::wrap::{WrapOptions, wrap_styled_spans};

/// Renders markdown text into styled lines wrapped at `width`.
pub fn render_markdown(text: &str, width: usize) -> Vec<StyledLine> {
    if text.is_empty() {
        return vec![StyledLine::empty()];
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    let parser = Parser::new_ext(text, options);
    let mut renderer = MarkdownRenderer::new(width);

    for event in parser {
        renderer.process_event(event);
    }

    renderer.finish()
}

/// Renders one prose segment, isolating rendering faults.
///
/// A pathological input that panics the markdown path must not take down
/// the sibling segments of the transcript; the segment degrades to plain
/// unstyled text instead.
pub fn render_prose(text: &str, width: usize) -> Vec<StyledLine> {
    catch_unwind(AssertUnwindSafe(|| render_markdown(text, width))).unwrap_or_else(|_| {
        tracing::warn!("markdown rendering panicked; falling back to plain text");
        text.lines()
            .map(|line| StyledLine {
                spans: vec![StyledSpan::new(line, Style::Assistant)],
            })
            .collect()
    })
}

/// Plain-text table buffer rendered through comfy-table.
#[derive(Debug, Clone, Default)]
struct TableBuffer {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    current_row: Vec<String>,
    current_cell: String,
}

impl TableBuffer {
    fn clear(&mut self) {
        self.header.clear();
        self.rows.clear();
        self.current_row.clear();
        self.current_cell.clear();
    }

    fn push_cell_text(&mut self, text: &str) {
        self.current_cell.push_str(text);
    }

    fn finish_cell(&mut self) {
        let cell = std::mem::take(&mut self.current_cell);
        self.current_row.push(cell);
    }

    fn finish_row(&mut self, is_header: bool) {
        let row = std::mem::take(&mut self.current_row);
        if is_header {
            self.header = row;
        } else {
            self.rows.push(row);
        }
    }

    fn render(&self, max_width: usize) -> Vec<String> {
        let mut table = Table::new();
        table.set_width(max_width as u16);
        table.set_content_arrangement(ContentArrangement::Dynamic);

        if !self.header.is_empty() {
            table.set_header(&self.header);
        }
        for row in &self.rows {
            table.add_row(row);
        }

        table.to_string().lines().map(String::from).collect()
    }
}

/// Ordered/unordered list nesting state.
#[derive(Debug, Clone)]
struct ListState {
    /// None for unordered, Some(n) for ordered starting at n.
    ordered: Option<u64>,
    current_item: u64,
}

/// Internal state for markdown rendering.
struct MarkdownRenderer {
    width: usize,
    lines: Vec<StyledLine>,
    current_spans: Vec<StyledSpan>,
    style_stack: Vec<Style>,
    in_code_block: bool,
    code_block_lang: Option<String>,
    list_stack: Vec<ListState>,
    in_table: bool,
    in_table_head: bool,
    table_buffer: TableBuffer,
}

impl MarkdownRenderer {
    fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            current_spans: Vec::new(),
            style_stack: vec![Style::Assistant],
            in_code_block: false,
            code_block_lang: None,
            list_stack: Vec::new(),
            in_table: false,
            in_table_head: false,
            table_buffer: TableBuffer::default(),
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or(Style::Assistant)
    }

    fn push_style(&mut self, style: Style) {
        self.style_stack.push(style);
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn process_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.add_text(&text),
            Event::Code(code) => self.add_inline_code(&code),
            Event::SoftBreak => self.add_break(" "),
            Event::HardBreak => self.add_break("\n"),
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.current_spans
                    .push(StyledSpan::new(marker, Style::ListBullet));
            }
            Event::Rule => {
                self.flush_paragraph();
                self.lines.push(StyledLine {
                    spans: vec![StyledSpan::new("─".repeat(self.width.min(40)), Style::Plain)],
                });
            }
            // Skip HTML to avoid terminal injection; footnotes and math
            // are not rendered.
            Event::Html(_)
            | Event::InlineHtml(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        match tag {
            Tag::Heading { level, .. } => {
                let style = match level {
                    HeadingLevel::H1 => Style::H1,
                    HeadingLevel::H2 => Style::H2,
                    _ => Style::H3,
                };
                self.push_style(style);
            }
            Tag::CodeBlock(kind) => {
                self.flush_paragraph();
                self.in_code_block = true;
                self.code_block_lang = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                self.push_style(Style::CodeBlock);
            }
            Tag::List(start) => {
                self.flush_paragraph();
                self.list_stack.push(ListState {
                    ordered: start,
                    current_item: start.unwrap_or(1),
                });
            }
            Tag::Item => self.flush_paragraph(),
            Tag::BlockQuote(_) => {
                self.flush_paragraph();
                self.push_style(Style::BlockQuote);
            }
            Tag::Emphasis => self.push_style(Style::Emphasis),
            Tag::Strong => self.push_style(Style::Strong),
            Tag::Strikethrough => self.push_style(Style::Plain),
            Tag::Link { .. } => self.push_style(Style::Link),
            Tag::Table(_) => {
                self.flush_paragraph();
                self.in_table = true;
                self.table_buffer.clear();
            }
            Tag::TableHead => self.in_table_head = true,
            Tag::TableCell => self.table_buffer.current_cell.clear(),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_paragraph();
                if self.list_stack.is_empty() {
                    self.lines.push(StyledLine::empty());
                }
            }
            TagEnd::Heading(_) => {
                self.flush_paragraph();
                self.pop_style();
                self.lines.push(StyledLine::empty());
            }
            TagEnd::CodeBlock => {
                self.flush_code_block();
                self.in_code_block = false;
                self.pop_style();
                self.lines.push(StyledLine::empty());
            }
            TagEnd::List(_) => {
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.lines.push(StyledLine::empty());
                }
            }
            TagEnd::Item => {
                self.flush_list_item();
                if let Some(list) = self.list_stack.last_mut() {
                    list.current_item += 1;
                }
            }
            TagEnd::BlockQuote(_) => {
                self.flush_paragraph();
                self.pop_style();
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.pop_style();
            }
            TagEnd::Table => {
                self.flush_table();
                self.in_table = false;
                self.lines.push(StyledLine::empty());
            }
            TagEnd::TableHead => {
                self.table_buffer.finish_row(true);
                self.in_table_head = false;
            }
            TagEnd::TableRow => {
                if !self.in_table_head {
                    self.table_buffer.finish_row(false);
                }
            }
            TagEnd::TableCell => self.table_buffer.finish_cell(),
            _ => {}
        }
    }

    fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.in_table {
            let text = text.replace('\n', " ");
            self.table_buffer.push_cell_text(&text);
            return;
        }
        let style = self.current_style();
        self.current_spans.push(StyledSpan::new(text, style));
    }

    fn add_inline_code(&mut self, code: &str) {
        if self.in_table {
            let code = code.replace('\n', " ");
            self.table_buffer.push_cell_text(&format!("`{code}`"));
            return;
        }
        self.current_spans
            .push(StyledSpan::new(code, Style::CodeInline));
    }

    fn add_break(&mut self, text: &str) {
        if self.in_table {
            self.table_buffer.push_cell_text(" ");
            return;
        }
        let style = self.current_style();
        self.current_spans.push(StyledSpan::new(text, style));
    }

    fn flush_paragraph(&mut self) {
        if self.current_spans.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.current_spans);
        let opts = WrapOptions::new(self.width);
        self.lines.extend(wrap_styled_spans(&spans, &opts));
    }

    fn flush_code_block(&mut self) {
        if self.current_spans.is_empty() {
            return;
        }

        // Code blocks are emitted as-is, line by line, no wrapping.
        let spans = std::mem::take(&mut self.current_spans);
        let full_text: String = spans.iter().map(|s| s.text.as_str()).collect();

        let fence_text = match &self.code_block_lang {
            Some(lang) => format!("```{lang}"),
            None => "```".to_string(),
        };
        self.lines.push(StyledLine {
            spans: vec![StyledSpan::new(fence_text, Style::CodeFence)],
        });

        for line in full_text.trim_end_matches('\n').split('\n') {
            self.lines.push(StyledLine {
                spans: vec![
                    StyledSpan::new("  ", Style::Plain),
                    StyledSpan::new(line, Style::CodeBlock),
                ],
            });
        }

        self.lines.push(StyledLine {
            spans: vec![StyledSpan::new("```", Style::CodeFence)],
        });
        self.code_block_lang = None;
    }

    fn flush_list_item(&mut self) {
        if self.current_spans.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.current_spans);

        let (marker, marker_style) = match self.list_stack.last() {
            Some(list) if list.ordered.is_some() => {
                (format!("{}. ", list.current_item), Style::ListNumber)
            }
            _ => ("• ".to_string(), Style::ListBullet),
        };

        let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
        let marker_width = marker.width();

        let opts = WrapOptions {
            width: self.width,
            first_prefix: vec![
                StyledSpan::new(indent.clone(), Style::Plain),
                StyledSpan::new(marker, marker_style),
            ],
            rest_prefix: vec![StyledSpan::new(
                format!("{indent}{}", " ".repeat(marker_width)),
                Style::Plain,
            )],
        };
        self.lines.extend(wrap_styled_spans(&spans, &opts));
    }

    fn flush_table(&mut self) {
        for line in self.table_buffer.render(self.width) {
            self.lines.push(StyledLine {
                spans: vec![StyledSpan::new(line, Style::Plain)],
            });
        }
        self.table_buffer.clear();
    }

    fn finish(mut self) -> Vec<StyledLine> {
        if !self.current_spans.is_empty() {
            if self.in_code_block {
                self.flush_code_block();
            } else {
                self.flush_paragraph();
            }
        }

        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        if self.lines.is_empty() {
            self.lines.push(StyledLine::empty());
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_style(lines: &[StyledLine], style: Style) -> bool {
        lines.iter().any(|l| l.spans.iter().any(|s| s.style == style))
    }

    fn combined(lines: &[StyledLine]) -> String {
        lines
            .iter()
            .map(StyledLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn inline_code_styled() {
        let lines = render_markdown("Use `code` here", 80);
        assert!(has_style(&lines, Style::CodeInline));
    }

    #[test]
    fn bold_and_italic() {
        let lines = render_markdown("**bold** and *italic*", 80);
        assert!(has_style(&lines, Style::Strong));
        assert!(has_style(&lines, Style::Emphasis));
    }

    #[test]
    fn heading_levels() {
        let lines = render_markdown("# H1\n\n## H2\n\n### H3", 80);
        assert!(has_style(&lines, Style::H1));
        assert!(has_style(&lines, Style::H2));
        assert!(has_style(&lines, Style::H3));
    }

    #[test]
    fn code_block_preserves_indentation() {
        let md = "```\nfn main() {\n    println!(\"hi\");\n}\n```";
        let lines = render_markdown(md, 20);
        assert!(has_style(&lines, Style::CodeBlock));
        assert!(combined(&lines).contains("    println!"));
    }

    #[test]
    fn lists_get_markers() {
        assert!(has_style(
            &render_markdown("- item 1\n- item 2", 80),
            Style::ListBullet
        ));
        assert!(has_style(
            &render_markdown("1. first\n2. second", 80),
            Style::ListNumber
        ));
    }

    #[test]
    fn task_list_markers_render() {
        let lines = render_markdown("- [x] done\n- [ ] open", 80);
        let text = combined(&lines);
        assert!(text.contains("[x]"));
        assert!(text.contains("[ ]"));
    }

    #[test]
    fn gfm_table_renders_cells() {
        let lines = render_markdown("| A | B |\n|---|---|\n| 1 | 2 |", 80);
        assert!(lines.len() >= 3);
        let text = combined(&lines);
        assert!(text.contains('A'));
        assert!(text.contains('2'));
    }

    #[test]
    fn html_is_skipped() {
        let lines = render_markdown("before\n\n<script>alert(1)</script>\n\nafter", 80);
        let text = combined(&lines);
        assert!(!text.contains("script"));
        assert!(text.contains("before"));
        assert!(text.contains("after"));
    }

    #[test]
    fn plain_text_passes_through() {
        let lines = render_markdown("Just plain text without any markdown", 80);
        assert!(has_style(&lines, Style::Assistant));
    }

    #[test]
    fn empty_input_yields_one_empty_line() {
        assert_eq!(render_markdown("", 80).len(), 1);
    }

    #[test]
    fn render_prose_matches_render_markdown_on_sane_input() {
        let md = "Some **prose** with a [link](https://example.com).";
        assert_eq!(render_prose(md, 60), render_markdown(md, 60));
    }
}
