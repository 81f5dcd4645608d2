//! Per-segment expand/collapse state.

use std::collections::HashMap;

use trx_core::transcript::SegmentId;

/// Expand/collapse flags for the tool segments of one message.
///
/// Keyed by segment identity within one parse of that message's transcript.
/// A segment never toggled is expanded, so tool cards show their content on
/// first appearance without a click, including ones still streaming in.
/// State is ephemeral: it lives as long as the owning message cell and is
/// never persisted.
#[derive(Debug, Clone, Default)]
pub struct CollapseState {
    expanded: HashMap<SegmentId, bool>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the segment is expanded. Defaults to true.
    pub fn is_expanded(&self, id: SegmentId) -> bool {
        self.expanded.get(&id).copied().unwrap_or(true)
    }

    /// Flips the flag for exactly one segment; all others are unaffected.
    pub fn toggle(&mut self, id: SegmentId) {
        let flag = self.expanded.entry(id).or_insert(true);
        *flag = !*flag;
    }
}

#[cfg(test)]
mod tests {
    use trx_core::transcript::SegmentKind;

    use super::*;

    fn id(kind: SegmentKind, index: usize) -> SegmentId {
        SegmentId { kind, index }
    }

    #[test]
    fn fresh_store_defaults_to_expanded() {
        let store = CollapseState::new();
        assert!(store.is_expanded(id(SegmentKind::ToolCall, 0)));
        assert!(store.is_expanded(id(SegmentKind::ToolResponse, 17)));
    }

    #[test]
    fn toggle_flips_only_the_target() {
        let mut store = CollapseState::new();
        let target = id(SegmentKind::ToolCall, 1);

        store.toggle(target);
        assert!(!store.is_expanded(target));
        assert!(store.is_expanded(id(SegmentKind::ToolCall, 2)));
        assert!(store.is_expanded(id(SegmentKind::ToolResponse, 1)));

        store.toggle(target);
        assert!(store.is_expanded(target));
    }
}
