//! `trx dump` — non-interactive outline of the segmented transcript.
//!
//! One line per segment with its kind and decoded headline. Useful for
//! piping and for checking what the viewer would render; a trailing
//! unterminated tool block is reported as withheld rather than dumped.

use std::path::Path;

use anyhow::Result;
use trx_core::session::{Role, Session};
use trx_core::transcript::{
    RunKind, SegmentKind, decode_tool_call, decode_tool_response, segment, split_runs,
};

pub fn run(file: &Path, json: bool) -> Result<()> {
    let session = Session::load_from(file)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&json_outline(&session))?);
    } else {
        let mut out = String::new();
        render_outline(&session, &mut out);
        print!("{out}");
    }
    Ok(())
}

/// Machine-readable outline: one entry per message with its segments.
fn json_outline(session: &Session) -> serde_json::Value {
    let messages: Vec<serde_json::Value> = session
        .messages
        .iter()
        .map(|message| {
            let role = match message.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            let segments: Vec<serde_json::Value> = segment(&message.content)
                .iter()
                .map(|seg| match seg.kind {
                    SegmentKind::Prose => serde_json::json!({
                        "kind": "prose",
                        "index": seg.index,
                        "text": seg.body(),
                    }),
                    SegmentKind::ToolCall => {
                        let record = decode_tool_call(seg.body());
                        serde_json::json!({
                            "kind": "tool_call",
                            "index": seg.index,
                            "title": record.title,
                            "tool_name": record.tool_name,
                            "arguments": record.arguments,
                        })
                    }
                    SegmentKind::ToolResponse => {
                        let record = decode_tool_response(seg.body());
                        serde_json::json!({
                            "kind": "tool_response",
                            "index": seg.index,
                            "title": record.title,
                            "output": record.output,
                        })
                    }
                })
                .collect();
            serde_json::json!({ "role": role, "segments": segments })
        })
        .collect();
    serde_json::json!({ "messages": messages })
}

fn preview(text: &str) -> String {
    let mut line = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    const MAX: usize = 72;
    if line.chars().count() > MAX {
        line = line.chars().take(MAX).collect::<String>() + "…";
    }
    line
}

fn render_outline(session: &Session, out: &mut String) {
    use std::fmt::Write;

    for (i, message) in session.messages.iter().enumerate() {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        let _ = writeln!(out, "message {} [{role}]", i + 1);

        if message.role == Role::User {
            let _ = writeln!(out, "  {}", preview(&message.content));
            continue;
        }

        for seg in segment(&message.content) {
            match seg.kind {
                SegmentKind::Prose => {
                    let _ = writeln!(out, "  prose: {}", preview(seg.body()));
                }
                SegmentKind::ToolCall => {
                    let record = decode_tool_call(seg.body());
                    let _ = write!(out, "  tool call: {}", preview(&record.title));
                    if let Some(name) = &record.tool_name {
                        let _ = write!(out, " (tool: {name})");
                    }
                    let args_lines = record
                        .arguments
                        .as_deref()
                        .map(str::trim)
                        .filter(|a| !a.is_empty())
                        .map_or(0, |a| a.lines().count());
                    if args_lines > 0 {
                        let _ = write!(out, " (args: {args_lines} lines)");
                    }
                    let _ = writeln!(out);
                }
                SegmentKind::ToolResponse => {
                    let record = decode_tool_response(seg.body());
                    let _ = write!(out, "  tool response: {}", preview(&record.title));
                    if record.output.is_empty() {
                        let _ = writeln!(out, " (no output)");
                    } else {
                        let _ = writeln!(out, " (output: {} lines)", record.output.lines().count());
                    }
                }
            }
        }

        if split_runs(&message.content)
            .last()
            .is_some_and(|run| run.kind == RunKind::Partial)
        {
            let _ = writeln!(out, "  (withheld: unterminated tool block)");
        }
    }
}
