//! Process-wide trace link builder.
//!
//! Trace configuration arrives late (config load, or a backend round trip in
//! the original system), so it is modeled as ambient state: initialized once
//! on first use, read lock-free afterwards, never torn down. Rendering must
//! not block on it; until [`initialize`] has run, [`build_url`] returns
//! `None` and the trace link is simply omitted.

use std::sync::OnceLock;

use url::Url;

use crate::config::TraceConfig;

static TRACE_CONFIG: OnceLock<TraceConfig> = OnceLock::new();

/// Installs the trace configuration. First call wins; later calls are no-ops.
pub fn initialize(config: TraceConfig) {
    let _ = TRACE_CONFIG.set(config);
}

/// Builds the trace page URL for a trace id.
///
/// Returns `None` when not yet initialized, when the config has no usable
/// server URL, or when the pieces do not form a valid URL.
pub fn build_url(trace_id: &str) -> Option<String> {
    let config = TRACE_CONFIG.get()?;
    let base = config.effective_server_url()?;

    let mut url = Url::parse(base).ok()?;
    {
        let mut path = url.path_segments_mut().ok()?;
        path.pop_if_empty();
        if let Some(experiment) = config.experiment_id.as_deref().map(str::trim)
            && !experiment.is_empty()
        {
            path.extend(["experiments", experiment]);
        }
        path.extend(["traces", trace_id]);
    }
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // OnceLock state is shared across tests in one process, so all
    // initialization paths are exercised in a single test body.
    #[test]
    fn build_url_lifecycle() {
        // Before initialization the link is simply absent.
        assert_eq!(build_url("tr-1"), None);

        initialize(TraceConfig {
            server_url: Some("https://mlflow.example.com".to_string()),
            experiment_id: Some("7".to_string()),
        });
        assert_eq!(
            build_url("tr-1").as_deref(),
            Some("https://mlflow.example.com/experiments/7/traces/tr-1")
        );

        // Re-initialization does not replace the first config.
        initialize(TraceConfig::default());
        assert!(build_url("tr-2").is_some());
    }
}
