//! Transcript segmentation and tool block decoding.
//!
//! Pure functions from raw assistant-turn text to typed segments and
//! structured tool records. The only mutable state in the whole pipeline
//! (expand/collapse flags) lives in the presentation layer, keyed by the
//! [`SegmentId`]s produced here.

mod decode;
mod segment;

pub use decode::{ToolCallRecord, ToolResponseRecord, decode_tool_call, decode_tool_response};
pub use segment::{
    Run, RunKind, Segment, SegmentId, SegmentKind, TOOL_END, TOOL_RESPONSE_END,
    TOOL_RESPONSE_START, TOOL_START, segment, split_runs,
};
