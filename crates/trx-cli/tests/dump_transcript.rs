use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const TRANSCRIPT: &str = "Let me look that up.\n\
<!-- TOOL_START -->\n\
Using tool: web_search\n\
\n\
Tool: web_search\n\
\n\
Arguments:\n\
{\"query\": \"rust viewer\"}\n\
<!-- TOOL_END -->\n\
<!-- TOOL_RESPONSE_START -->\n\
Tool response:\n\
\n\
Found 3 results.\n\
<!-- TOOL_RESPONSE_END -->\n\
Here is what I found.";

#[test]
fn dump_outlines_segments_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("turn.txt");
    fs::write(&path, TRANSCRIPT).unwrap();

    Command::cargo_bin("trx")
        .unwrap()
        .args(["dump", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("message 1 [assistant]"))
        .stdout(predicate::str::contains(
            "tool call: Using tool: web_search (tool: web_search)",
        ))
        .stdout(predicate::str::contains("tool response: Tool response:"))
        .stdout(predicate::str::contains("prose: Here is what I found."));
}

#[test]
fn dump_withholds_unterminated_block() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("streaming.txt");
    fs::write(
        &path,
        "Checking.\n<!-- TOOL_START -->\nUsing tool: read\npartial",
    )
    .unwrap();

    Command::cargo_bin("trx")
        .unwrap()
        .args(["dump", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("withheld: unterminated tool block"))
        .stdout(predicate::str::contains("Using tool: read").not());
}

#[test]
fn dump_json_reports_segment_kinds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("turn.txt");
    fs::write(&path, TRANSCRIPT).unwrap();

    let output = Command::cargo_bin("trx")
        .unwrap()
        .args(["dump", "--json", path.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let segments = &value["messages"][0]["segments"];
    assert_eq!(segments[0]["kind"], "prose");
    assert_eq!(segments[1]["kind"], "tool_call");
    assert_eq!(segments[1]["tool_name"], "web_search");
    assert_eq!(segments[2]["kind"], "tool_response");
    assert_eq!(segments[3]["kind"], "prose");
}

#[test]
fn dump_session_json_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    let session = serde_json::json!({
        "id": "s-1",
        "messages": [
            {"role": "user", "content": "hi"},
            {"role": "assistant", "content": "hello"}
        ]
    });
    fs::write(&path, serde_json::to_string(&session).unwrap()).unwrap();

    Command::cargo_bin("trx")
        .unwrap()
        .args(["dump", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("message 1 [user]"))
        .stdout(predicate::str::contains("message 2 [assistant]"));
}
