//! Full-screen transcript viewer for trx.

pub mod events;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod transcript;
pub mod update;

use std::io::{IsTerminal, Write, stderr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
pub use runtime::ViewerRuntime;
use trx_core::config::Config;
use trx_core::session::Session;

/// Runs the interactive transcript viewer.
///
/// `follow_path` enables follow mode: the file is polled for changes and
/// the transcript re-renders wholesale on each update.
pub fn run_viewer(config: Config, session: &Session, follow_path: Option<PathBuf>) -> Result<()> {
    // The viewer requires a terminal to render.
    if !stderr().is_terminal() {
        anyhow::bail!(
            "Viewing requires a terminal.\n\
             Use `trx dump <file>` for non-interactive output."
        );
    }

    // Print pre-TUI info to stderr (replaced by the alternate screen).
    let mut err = stderr();
    writeln!(err, "trx — {}", session.display_title())?;
    writeln!(err, "Messages: {}", session.messages.len())?;
    if follow_path.is_some() {
        writeln!(err, "Follow mode: on")?;
    }
    err.flush()?;

    let poll = Duration::from_millis(config.viewer.follow_poll_ms.max(50));
    let follow = follow_path.is_some();
    let mut viewer = ViewerRuntime::new(config, session, follow)?;

    // Follow mode needs a tokio runtime for the watcher task; it lives as
    // long as the viewer does.
    let _watcher_runtime = match follow_path {
        Some(path) => {
            let rt = tokio::runtime::Runtime::new()?;
            runtime::spawn_follow_watcher(rt.handle(), path, poll, viewer.inbox_sender());
            Some(rt)
        }
        None => None,
    };

    viewer.run()
}
