//! Width-aware wrapping of styled spans.
//!
//! Markdown paragraphs wrap at word boundaries with optional hanging
//! indents; code spans preserve whitespace and break by character. Raw tool
//! output uses [`wrap_chars`], which never reflows words.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::style::{Style, StyledLine, StyledSpan};

/// Options for wrapping styled spans with hanging indents.
#[derive(Debug, Clone, Default)]
pub struct WrapOptions {
    /// Maximum display width for lines.
    pub width: usize,
    /// Prefix spans for the first line (e.g. a list bullet).
    pub first_prefix: Vec<StyledSpan>,
    /// Prefix spans for continuation lines (alignment).
    pub rest_prefix: Vec<StyledSpan>,
}

impl WrapOptions {
    /// Creates wrap options with just a width (no prefixes).
    pub fn new(width: usize) -> Self {
        Self {
            width,
            first_prefix: vec![],
            rest_prefix: vec![],
        }
    }
}

/// Breaks a plain string into width-bounded fragments, character by
/// character. Zero-width characters stay attached to the current fragment.
pub fn wrap_chars(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if ch_width == 0 {
            current.push(ch);
            continue;
        }
        if current_width + ch_width > max_width && !current.is_empty() {
            parts.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
    }

    if !current.is_empty() || parts.is_empty() {
        parts.push(current);
    }
    parts
}

fn spans_display_width(spans: &[StyledSpan]) -> usize {
    spans.iter().map(|s| s.text.width()).sum()
}

/// Line-building state threaded through the wrap helpers.
struct WrapContext<'a> {
    lines: Vec<StyledLine>,
    current: Vec<StyledSpan>,
    current_width: usize,
    is_first_line: bool,
    rest_width: usize,
    first_prefix: &'a [StyledSpan],
    rest_prefix: &'a [StyledSpan],
}

impl<'a> WrapContext<'a> {
    fn new(opts: &'a WrapOptions, rest_width: usize) -> Self {
        Self {
            lines: Vec::new(),
            current: Vec::new(),
            current_width: 0,
            is_first_line: true,
            rest_width,
            first_prefix: &opts.first_prefix,
            rest_prefix: &opts.rest_prefix,
        }
    }

    fn flush_line(&mut self) {
        let mut spans = if self.is_first_line {
            self.first_prefix.to_vec()
        } else {
            self.rest_prefix.to_vec()
        };
        spans.append(&mut self.current);
        self.lines.push(StyledLine { spans });
        self.is_first_line = false;
        self.current_width = 0;
    }

    fn avail(&self, first_width: usize) -> usize {
        if self.is_first_line {
            first_width
        } else {
            self.rest_width
        }
    }

    fn push_fragment(&mut self, text: String, style: Style, first_width: usize) {
        let width = text.width();
        if self.current_width + width > self.avail(first_width) && self.current_width > 0 {
            self.flush_line();
        }
        if !text.is_empty() {
            self.current.push(StyledSpan { text, style });
            self.current_width += width;
        }
    }
}

/// Wraps styled spans while preserving styles across line breaks.
///
/// - Word boundaries for normal text (whitespace collapses to single spaces)
/// - Whitespace preserved for code spans, broken by character when needed
/// - Hanging indents via [`WrapOptions`]
pub fn wrap_styled_spans(spans: &[StyledSpan], opts: &WrapOptions) -> Vec<StyledLine> {
    if opts.width == 0 || spans.is_empty() {
        let mut all = opts.first_prefix.clone();
        all.extend(spans.iter().cloned());
        return vec![StyledLine { spans: all }];
    }

    let first_width = opts.width.saturating_sub(spans_display_width(&opts.first_prefix));
    let rest_width = opts.width.saturating_sub(spans_display_width(&opts.rest_prefix));
    let mut ctx = WrapContext::new(opts, rest_width);

    for span in spans {
        // Hard breaks inside a span force line flushes.
        for (i, part) in span.text.split('\n').enumerate() {
            if i > 0 {
                ctx.flush_line();
            }
            if part.is_empty() {
                continue;
            }
            let part_span = StyledSpan::new(part, span.style);
            if matches!(span.style, Style::CodeInline | Style::CodeBlock) {
                wrap_code_span(&part_span, &mut ctx, first_width);
            } else {
                wrap_text_span(&part_span, &mut ctx, first_width);
            }
        }
    }

    if !ctx.current.is_empty() {
        ctx.flush_line();
    }
    if ctx.lines.is_empty() {
        ctx.lines.push(StyledLine {
            spans: opts.first_prefix.clone(),
        });
    }
    ctx.lines
}

/// Code spans keep whitespace; break by character when too wide.
fn wrap_code_span(span: &StyledSpan, ctx: &mut WrapContext, first_width: usize) {
    let span_width = span.text.width();
    let avail = ctx.avail(first_width);

    if ctx.current_width + span_width <= avail {
        ctx.current.push(span.clone());
        ctx.current_width += span_width;
        return;
    }

    if span_width <= ctx.rest_width && ctx.current_width > 0 {
        ctx.flush_line();
        ctx.current.push(span.clone());
        ctx.current_width = span_width;
        return;
    }

    let remaining = avail.saturating_sub(ctx.current_width).max(1);
    let mut fragments = wrap_chars(&span.text, remaining).into_iter();
    if let Some(first) = fragments.next() {
        ctx.push_fragment(first, span.style, first_width);
    }
    for frag in fragments {
        ctx.flush_line();
        ctx.push_fragment(frag, span.style, first_width);
    }
}

/// Normal text wraps at word boundaries; interior whitespace collapses.
fn wrap_text_span(span: &StyledSpan, ctx: &mut WrapContext, first_width: usize) {
    let has_leading_space = span.text.starts_with(|c: char| c.is_whitespace());
    let has_trailing_space = span.text.ends_with(|c: char| c.is_whitespace());
    let words: Vec<&str> = span.text.split_whitespace().collect();

    let maybe_space = |ctx: &mut WrapContext| {
        if !ctx.current.is_empty() && ctx.current_width < ctx.avail(first_width) {
            ctx.current.push(StyledSpan::new(" ", span.style));
            ctx.current_width += 1;
        }
    };

    if words.is_empty() {
        // Whitespace-only span joins adjacent spans with a single space.
        maybe_space(ctx);
        return;
    }

    if has_leading_space {
        maybe_space(ctx);
    }

    for (i, word) in words.iter().enumerate() {
        let word_width = word.width();

        if i > 0 {
            if ctx.current_width + 1 + word_width <= ctx.avail(first_width) {
                ctx.current.push(StyledSpan::new(" ", span.style));
                ctx.current_width += 1;
            } else {
                ctx.flush_line();
            }
        }

        if word_width <= ctx.avail(first_width).saturating_sub(ctx.current_width) {
            ctx.current.push(StyledSpan::new(*word, span.style));
            ctx.current_width += word_width;
        } else if word_width <= ctx.rest_width && ctx.current_width > 0 {
            ctx.flush_line();
            ctx.current.push(StyledSpan::new(*word, span.style));
            ctx.current_width = word_width;
        } else {
            // Word wider than the line: break it by character.
            if ctx.current_width > 0 {
                ctx.flush_line();
            }
            for frag in wrap_chars(word, ctx.avail(first_width)) {
                if ctx.current_width > 0 {
                    ctx.flush_line();
                }
                ctx.push_fragment(frag, span.style, first_width);
            }
        }
    }

    if has_trailing_space {
        maybe_space(ctx);
    }
}
