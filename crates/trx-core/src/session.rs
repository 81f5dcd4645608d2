//! Session and message model.
//!
//! A session is an ordered list of user/assistant messages as recorded by
//! the chat backend. Assistant message content may embed tool markers; that
//! text is handed to the transcript segmenter untouched. Sources are opaque
//! citation records attached to a message; the viewer only selects them by
//! index and never parses their content.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One citation record attached to an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SourceRef {
    /// Cited content, displayed verbatim.
    pub content: String,
    #[serde(default)]
    pub metadata: SourceMetadata,
}

/// Opaque source metadata. Only the URL is surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SourceMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Response timing metrics recorded by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Metrics {
    /// Seconds until the first token arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_first_token: Option<f64>,
    /// Total response time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<f64>,
}

impl Metrics {
    /// Formats the metrics for the status area, e.g. `0.42s to first token + 3.10s`.
    pub fn display(&self) -> Option<String> {
        match (self.time_to_first_token, self.total_time) {
            (Some(first), Some(total)) => {
                Some(format!("{first:.2}s to first token + {total:.2}s"))
            }
            (None, Some(total)) => Some(format!("{total:.2}s")),
            (Some(first), None) => Some(format!("{first:.2}s to first token")),
            (None, None) => None,
        }
    }
}

/// One message of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    /// Full raw content of the turn, tool markers included.
    pub content: String,
    /// Backend trace identifier, when the backend recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
}

impl Message {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            trace_id: None,
            sources: Vec::new(),
            metrics: None,
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            trace_id: None,
            sources: Vec::new(),
            metrics: None,
        }
    }
}

/// A recorded chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Session {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Session {
    /// Loads a session from a file.
    ///
    /// A `.json` file is parsed as a recorded session; any other file is
    /// wrapped as a session with a single assistant turn, which makes raw
    /// transcript dumps viewable directly.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session from {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse session from {}", path.display()))
        } else {
            Ok(Self::from_transcript(&contents))
        }
    }

    /// Wraps a bare transcript string as a one-message session.
    pub fn from_transcript(content: &str) -> Self {
        Session {
            messages: vec![Message::assistant(content)],
            ..Session::default()
        }
    }

    /// Returns the display title: explicit title, else the id, else a stub.
    pub fn display_title(&self) -> &str {
        if let Some(title) = self.title.as_deref()
            && !title.is_empty()
        {
            return title;
        }
        if self.id.is_empty() {
            "transcript"
        } else {
            &self.id
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn parses_session_json() {
        let json = r#"{
            "id": "s-1",
            "title": "Stress run",
            "messages": [
                {"role": "user", "content": "hello"},
                {
                    "role": "assistant",
                    "content": "hi there",
                    "trace_id": "tr-42",
                    "sources": [
                        {"content": "doc text", "metadata": {"url": "https://example.com/doc"}}
                    ],
                    "metrics": {"time_to_first_token": 0.5, "total_time": 2.25}
                }
            ]
        }"#;

        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.display_title(), "Stress run");
        assert_eq!(session.messages.len(), 2);

        let reply = &session.messages[1];
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.trace_id.as_deref(), Some("tr-42"));
        assert_eq!(reply.sources[0].metadata.url.as_deref(), Some("https://example.com/doc"));
        assert_eq!(
            reply.metrics.unwrap().display().as_deref(),
            Some("0.50s to first token + 2.25s")
        );
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"messages": [{"role": "assistant", "content": "x"}]}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        let msg = &session.messages[0];
        assert!(msg.trace_id.is_none());
        assert!(msg.sources.is_empty());
        assert!(msg.metrics.is_none());
        assert_eq!(session.display_title(), "transcript");
    }

    #[test]
    fn non_json_file_loads_as_single_turn() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("turn.txt");
        fs::write(&path, "plain transcript text").unwrap();

        let session = Session::load_from(&path).unwrap();
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].role, Role::Assistant);
        assert_eq!(session.messages[0].content, "plain transcript text");
    }

    #[test]
    fn invalid_json_is_an_error_with_path_context() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let err = Session::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}
