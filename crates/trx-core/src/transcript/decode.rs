//! Decoding of tool block bodies into structured records.
//!
//! The segmenter is marker-pair-aware but content-agnostic; these decoders
//! own the body grammar. Both are total functions: a malformed body (missing
//! `Tool:` line, missing `Arguments:` marker, truncated JSON) degrades to
//! unset fields, never to an error. Argument text is kept verbatim rather
//! than re-parsed so that partially streamed or slightly broken JSON still
//! displays as-is.

/// Line prefix that names the invoked tool.
const TOOL_NAME_PREFIX: &str = "Tool:";
/// Marker line that starts the verbatim argument payload.
const ARGUMENTS_MARKER: &str = "Arguments:";

/// Structured view of a tool-invocation block body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolCallRecord {
    /// First line of the body, the human-readable invocation header.
    pub title: String,
    /// Tool name from a `Tool:` line, if one was present.
    pub tool_name: Option<String>,
    /// Everything after the `Arguments:` marker line, newline-joined and
    /// verbatim. `Some("")` when the marker was the last line.
    pub arguments: Option<String>,
}

/// Structured view of a tool-response block body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolResponseRecord {
    /// First line of the body.
    pub title: String,
    /// Remaining output text, verbatim newline-joined and trimmed.
    /// Empty when the tool produced no output; the renderer must show an
    /// explicit placeholder in that case, not an empty box.
    pub output: String,
}

fn skip_blank(lines: &[&str], mut i: usize) -> usize {
    while i < lines.len() && lines[i].trim().is_empty() {
        i += 1;
    }
    i
}

/// Decodes a tool-invocation body (markers already stripped, trimmed).
pub fn decode_tool_call(body: &str) -> ToolCallRecord {
    let lines: Vec<&str> = body.lines().collect();
    let mut record = ToolCallRecord {
        title: lines.first().map(|l| (*l).to_string()).unwrap_or_default(),
        ..ToolCallRecord::default()
    };

    let mut i = skip_blank(&lines, 1);

    if let Some(rest) = lines.get(i).and_then(|l| l.strip_prefix(TOOL_NAME_PREFIX)) {
        let name = rest.trim();
        if !name.is_empty() {
            record.tool_name = Some(name.to_string());
        }
        i += 1;
    }

    i = skip_blank(&lines, i);

    if lines.get(i).is_some_and(|l| l.starts_with(ARGUMENTS_MARKER)) {
        record.arguments = Some(lines[i + 1..].join("\n"));
    }

    record
}

/// Decodes a tool-response body (markers already stripped, trimmed).
pub fn decode_tool_response(body: &str) -> ToolResponseRecord {
    let lines: Vec<&str> = body.lines().collect();
    let title = lines.first().map(|l| (*l).to_string()).unwrap_or_default();

    let i = skip_blank(&lines, 1);
    let output = lines[i.min(lines.len())..].join("\n").trim().to_string();

    ToolResponseRecord { title, output }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_tool_call_body() {
        let body =
            "Using tool: web_search\n\nTool: web_search\n\nArguments:\n{\n  \"query\": \"rust\"\n}";
        let record = decode_tool_call(body);
        assert_eq!(record.title, "Using tool: web_search");
        assert_eq!(record.tool_name.as_deref(), Some("web_search"));
        assert_eq!(record.arguments.as_deref(), Some("{\n  \"query\": \"rust\"\n}"));
    }

    #[test]
    fn title_only_body() {
        let record = decode_tool_call("Title only\n");
        assert_eq!(record.title, "Title only");
        assert_eq!(record.tool_name, None);
        assert_eq!(record.arguments, None);
    }

    #[test]
    fn missing_arguments_marker() {
        let record = decode_tool_call("Using tool: read\n\nTool: read");
        assert_eq!(record.tool_name.as_deref(), Some("read"));
        assert_eq!(record.arguments, None);
    }

    #[test]
    fn missing_tool_line_still_finds_arguments() {
        let record = decode_tool_call("Using a tool\n\nArguments:\n{\"a\": 1}");
        assert_eq!(record.tool_name, None);
        assert_eq!(record.arguments.as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn arguments_marker_with_no_payload() {
        let record = decode_tool_call("Title\n\nArguments:");
        assert_eq!(record.arguments.as_deref(), Some(""));
    }

    #[test]
    fn malformed_json_arguments_kept_verbatim() {
        // Partially streamed JSON must survive untouched.
        let record = decode_tool_call("Title\n\nTool: edit\n\nArguments:\n{\"path\": \"src/ma");
        assert_eq!(record.arguments.as_deref(), Some("{\"path\": \"src/ma"));
    }

    #[test]
    fn multi_line_arguments_preserve_interior_blanks() {
        let record = decode_tool_call("Title\n\nArguments:\nline 1\n\nline 3");
        assert_eq!(record.arguments.as_deref(), Some("line 1\n\nline 3"));
    }

    #[test]
    fn empty_body() {
        let record = decode_tool_call("");
        assert_eq!(record.title, "");
        assert_eq!(record.tool_name, None);
        assert_eq!(record.arguments, None);
    }

    #[test]
    fn response_with_output() {
        let record = decode_tool_response("Tool response:\n\nresult line 1\nresult line 2");
        assert_eq!(record.title, "Tool response:");
        assert_eq!(record.output, "result line 1\nresult line 2");
    }

    #[test]
    fn response_with_empty_output() {
        let record = decode_tool_response("Response\n\n");
        assert_eq!(record.title, "Response");
        assert_eq!(record.output, "");
    }

    #[test]
    fn response_title_only() {
        let record = decode_tool_response("Tool response:");
        assert_eq!(record.output, "");
    }

    #[test]
    fn response_output_is_trimmed_but_interior_preserved() {
        let record = decode_tool_response("T\n\n  a\n\n  b  \n");
        assert_eq!(record.output, "a\n\n  b");
    }
}
