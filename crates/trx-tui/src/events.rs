//! Inbox events delivered to the viewer loop.

use trx_core::session::Session;

/// Events produced outside the render loop (the follow watcher).
///
/// Updates replace the session snapshot wholesale; if several pile up
/// between frames only the last one matters (last-write-wins).
#[derive(Debug)]
pub enum ViewerEvent {
    /// The watched session file changed; here is the new snapshot.
    SessionUpdated(Session),
    /// No change observed for a while after updates: streaming settled.
    StreamSettled,
}
