//! Semantic styles for transcript rendering (UI-agnostic).

/// A styled span of text.
///
/// Minimal representation converted to ratatui Span/Line types at render
/// time. Keeping this UI-agnostic keeps the transcript module free of
/// terminal dependencies and directly testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: Style,
}

impl StyledSpan {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A line of styled spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    /// Creates an empty line.
    pub fn empty() -> Self {
        StyledLine { spans: vec![] }
    }

    /// Concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Semantic style identifiers, translated to terminal styles by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// No styling.
    Plain,
    /// User message prefix ("│ ").
    UserPrefix,
    /// User message content.
    User,
    /// Assistant prose content.
    Assistant,
    /// Assistant label line above a message.
    AssistantLabel,
    /// Streaming cursor indicator.
    StreamingCursor,
    /// Clickable tool card header (title line).
    ToolHeader,
    /// Disclosure indicator on a tool header (▼/▶).
    ToolDisclosure,
    /// Tool name line inside an expanded call card.
    ToolName,
    /// Section label inside a card ("Arguments:").
    ToolSectionLabel,
    /// Raw tool output / argument text.
    ToolOutput,
    /// Explicit empty-output placeholder.
    Placeholder,
    /// Trace link line.
    TraceLink,
    /// Response metrics line.
    Metrics,

    // Markdown styles
    /// Inline code (`code`).
    CodeInline,
    /// Fenced code block content.
    CodeBlock,
    /// Code fence markers (rendered subtly).
    CodeFence,
    /// Emphasized text (*italic*).
    Emphasis,
    /// Strong text (**bold**).
    Strong,
    /// Heading level 1.
    H1,
    /// Heading level 2.
    H2,
    /// Heading level 3+.
    H3,
    /// Link text.
    Link,
    /// Blockquote content.
    BlockQuote,
    /// List bullet marker.
    ListBullet,
    /// List number marker.
    ListNumber,
}
