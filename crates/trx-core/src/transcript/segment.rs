//! Sentinel-delimited transcript segmentation.
//!
//! An assistant turn is a single text blob that interleaves free-form prose
//! with tool-invocation and tool-response blocks wrapped in literal marker
//! pairs. Segmentation happens in two stages:
//!
//! - [`split_runs`] partitions the text losslessly: concatenating the `raw`
//!   of every run reconstructs the input byte for byte. An unterminated
//!   start marker produces a trailing [`RunKind::Partial`] run.
//! - [`segment`] is the rendered view: it drops the partial tail (the block
//!   is still streaming in) and whitespace-only prose runs, and assigns
//!   stable 0-based indices to what remains.
//!
//! Both functions are pure and never fail. Marker pairs are non-nested; an
//! end marker without a preceding start marker gets no special handling and
//! falls through as literal prose.

/// Opens a tool-invocation block.
pub const TOOL_START: &str = "<!-- TOOL_START -->";
/// Closes a tool-invocation block.
pub const TOOL_END: &str = "<!-- TOOL_END -->";
/// Opens a tool-response block.
pub const TOOL_RESPONSE_START: &str = "<!-- TOOL_RESPONSE_START -->";
/// Closes a tool-response block.
pub const TOOL_RESPONSE_END: &str = "<!-- TOOL_RESPONSE_END -->";

/// Classification of a raw run from [`split_runs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    /// Text between or around delimited blocks.
    Prose,
    /// A complete `TOOL_START..TOOL_END` block, markers included.
    ToolCall,
    /// A complete `TOOL_RESPONSE_START..TOOL_RESPONSE_END` block, markers included.
    ToolResponse,
    /// An unterminated start marker through end of input.
    ///
    /// Occurs naturally mid-stream; the block is withheld from the rendered
    /// view until its end marker arrives.
    Partial,
}

/// A raw run of the transcript. Borrowed; exact substring of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<'a> {
    pub kind: RunKind,
    pub raw: &'a str,
}

/// Kind of a rendered segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Prose,
    ToolCall,
    ToolResponse,
}

/// Identity of a segment within one parse of one transcript.
///
/// Indices are positions in the [`segment`] output sequence, so they are
/// only stable for structurally compatible transcripts. Streaming appends
/// content, which leaves existing indices untouched; anything else must
/// reset state keyed by these ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentId {
    pub kind: SegmentKind,
    pub index: usize,
}

/// A typed segment of one assistant turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Position in the rendered sequence (0-based).
    pub index: usize,
    /// Exact substring consumed: delimiters included for tool kinds,
    /// the untrimmed text between delimiters for prose.
    pub raw: String,
}

impl Segment {
    /// Returns this segment's identity within the current parse.
    pub fn id(&self) -> SegmentId {
        SegmentId {
            kind: self.kind,
            index: self.index,
        }
    }

    /// Returns the block interior with markers stripped and outer
    /// whitespace trimmed. For prose this is the raw text trimmed.
    pub fn body(&self) -> &str {
        let inner = match self.kind {
            SegmentKind::Prose => self.raw.as_str(),
            SegmentKind::ToolCall => strip_markers(&self.raw, TOOL_START, TOOL_END),
            SegmentKind::ToolResponse => {
                strip_markers(&self.raw, TOOL_RESPONSE_START, TOOL_RESPONSE_END)
            }
        };
        inner.trim()
    }
}

fn strip_markers<'a>(raw: &'a str, start: &str, end: &str) -> &'a str {
    raw.strip_prefix(start)
        .and_then(|s| s.strip_suffix(end))
        .unwrap_or(raw)
}

/// Finds the earliest start marker in `text`, if any.
fn next_block_start(text: &str) -> Option<(usize, RunKind, &'static str, &'static str)> {
    let call = text
        .find(TOOL_START)
        .map(|at| (at, RunKind::ToolCall, TOOL_START, TOOL_END));
    let response = text.find(TOOL_RESPONSE_START).map(|at| {
        (
            at,
            RunKind::ToolResponse,
            TOOL_RESPONSE_START,
            TOOL_RESPONSE_END,
        )
    });
    match (call, response) {
        (Some(c), Some(r)) => Some(if c.0 <= r.0 { c } else { r }),
        (some @ Some(_), None) | (None, some @ Some(_)) => some,
        (None, None) => None,
    }
}

/// Partitions a transcript into maximal raw runs.
///
/// Lossless: concatenating `raw` of all runs in order reconstructs the
/// input exactly, including empty-looking prose and any withheld partial
/// tail. End markers are only matched after their start marker, so an
/// orphan end marker stays inside a prose run.
pub fn split_runs(text: &str) -> Vec<Run<'_>> {
    let mut runs = Vec::new();
    let mut at = 0;

    while at < text.len() {
        let rest = &text[at..];
        let Some((start_at, kind, start_marker, end_marker)) = next_block_start(rest) else {
            runs.push(Run {
                kind: RunKind::Prose,
                raw: rest,
            });
            break;
        };

        if start_at > 0 {
            runs.push(Run {
                kind: RunKind::Prose,
                raw: &rest[..start_at],
            });
        }

        let body_at = start_at + start_marker.len();
        match rest[body_at..].find(end_marker) {
            Some(end_at) => {
                let block_end = body_at + end_at + end_marker.len();
                runs.push(Run {
                    kind,
                    raw: &rest[start_at..block_end],
                });
                at += block_end;
            }
            None => {
                // Still streaming: hold the tail back rather than render a
                // half-formed block as prose or a broken card.
                runs.push(Run {
                    kind: RunKind::Partial,
                    raw: &rest[start_at..],
                });
                break;
            }
        }
    }

    runs
}

/// Splits a transcript into the ordered rendered segment sequence.
///
/// Partial tails and whitespace-only prose carry no renderable content and
/// are dropped; indices are assigned over what remains. Any input yields a
/// valid (possibly empty) decomposition.
pub fn segment(text: &str) -> Vec<Segment> {
    split_runs(text)
        .into_iter()
        .filter_map(|run| {
            let kind = match run.kind {
                RunKind::Prose => {
                    if run.raw.trim().is_empty() {
                        return None;
                    }
                    SegmentKind::Prose
                }
                RunKind::ToolCall => SegmentKind::ToolCall,
                RunKind::ToolResponse => SegmentKind::ToolResponse,
                RunKind::Partial => return None,
            };
            Some((kind, run.raw))
        })
        .enumerate()
        .map(|(index, (kind, raw))| Segment {
            kind,
            index,
            raw: raw.to_string(),
        })
        .collect()
}
