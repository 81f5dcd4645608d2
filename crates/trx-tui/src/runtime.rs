//! Viewer runtime: owns the terminal, runs the event loop.
//!
//! The loop is synchronous and processes one event at a time; the only
//! asynchronous piece is the follow watcher, a tokio task that re-reads the
//! session file and posts snapshots to the inbox channel. The loop drains
//! the inbox each frame, so a burst of updates collapses into the newest
//! snapshot (last-write-wins).

use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use trx_core::config::Config;
use trx_core::session::Session;

use crate::events::ViewerEvent;
use crate::state::ViewerState;
use crate::{render, terminal, update};

/// Event poll timeout while streaming updates are arriving.
const ACTIVE_POLL: Duration = Duration::from_millis(50);
/// Event poll timeout when idle.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Quiet polls after the last change before the stream counts as settled.
const SETTLE_QUIET_POLLS: u32 = 2;

/// Full-screen viewer runtime.
pub struct ViewerRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: ViewerState,
    inbox_tx: mpsc::UnboundedSender<ViewerEvent>,
    inbox_rx: mpsc::UnboundedReceiver<ViewerEvent>,
}

impl ViewerRuntime {
    /// Creates the runtime: installs the panic hook and takes the terminal.
    pub fn new(config: Config, session: &Session, follow: bool) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal,
            state: ViewerState::new(config, session, follow),
            inbox_tx,
            inbox_rx,
        })
    }

    /// Sender for the inbox channel, handed to the follow watcher.
    pub fn inbox_sender(&self) -> mpsc::UnboundedSender<ViewerEvent> {
        self.inbox_tx.clone()
    }

    /// Runs the event loop until quit, then restores the terminal.
    pub fn run(&mut self) -> Result<()> {
        let result = self.event_loop();
        let _ = terminal::restore_terminal();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            // Drain the inbox; a superseded snapshot is overwritten by the
            // next before it ever renders.
            while let Ok(viewer_event) = self.inbox_rx.try_recv() {
                update::handle_viewer_event(&mut self.state, viewer_event);
                dirty = true;
            }

            if dirty {
                self.terminal
                    .draw(|frame| render::render(frame, &mut self.state))
                    .context("Failed to draw frame")?;
                dirty = false;
            }

            let timeout = if self.state.streaming {
                ACTIVE_POLL
            } else {
                IDLE_POLL
            };
            if event::poll(timeout).context("Failed to poll terminal events")? {
                match event::read().context("Failed to read terminal event")? {
                    Event::Key(key) if !matches!(key.kind, KeyEventKind::Release) => {
                        update::handle_key(&mut self.state, key);
                        dirty = true;
                    }
                    Event::Mouse(mouse) => {
                        update::handle_mouse(&mut self.state, mouse);
                        dirty = true;
                    }
                    Event::Resize(_, _) => dirty = true,
                    _ => {}
                }
            }
        }

        Ok(())
    }
}

/// File fingerprint used to detect changes without reading the content.
type Fingerprint = Option<(u64, Option<std::time::SystemTime>)>;

fn fingerprint(path: &std::path::Path) -> Fingerprint {
    std::fs::metadata(path)
        .ok()
        .map(|m| (m.len(), m.modified().ok()))
}

/// Spawns the follow watcher on the given tokio handle.
///
/// Polls the file; on change it re-reads the whole session and posts a
/// snapshot. After [`SETTLE_QUIET_POLLS`] unchanged polls following an
/// update it posts a settle event. The task ends when the receiver is gone.
pub fn spawn_follow_watcher(
    handle: &tokio::runtime::Handle,
    path: PathBuf,
    poll: Duration,
    tx: mpsc::UnboundedSender<ViewerEvent>,
) {
    let mut last = fingerprint(&path);
    handle.spawn(async move {
        let mut quiet_polls = 0u32;
        let mut pending_settle = false;

        loop {
            tokio::time::sleep(poll).await;

            let current = fingerprint(&path);
            if current != last {
                last = current;
                match Session::load_from(&path) {
                    Ok(session) => {
                        if tx.send(ViewerEvent::SessionUpdated(session)).is_err() {
                            return;
                        }
                        pending_settle = true;
                        quiet_polls = 0;
                    }
                    // A half-written file shows up as a parse error; the
                    // next poll picks up the finished write.
                    Err(err) => tracing::debug!(error = %err, "skipping unreadable snapshot"),
                }
            } else if pending_settle {
                quiet_polls += 1;
                if quiet_polls >= SETTLE_QUIET_POLLS {
                    pending_settle = false;
                    if tx.send(ViewerEvent::StreamSettled).is_err() {
                        return;
                    }
                }
            }
        }
    });
}
