use std::collections::HashMap;

use nestview_core::NodeId;

use crate::node::{Node, for_each_node};

/// Expanded/collapsed state keyed by stable identity.
///
/// Entries are never removed one by one; identities that disappear from the
/// data simply stop being looked up. `reset` drops everything when a new data
/// set is installed.
#[derive(Debug, Default)]
pub struct ExpansionStore {
    states: HashMap<NodeId, bool>,
}

impl ExpansionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapsed unless recorded otherwise; an unseen identity gets its
    /// default recorded.
    pub fn is_expanded(&mut self, id: NodeId) -> bool {
        *self.states.entry(id).or_insert(false)
    }

    /// Read-only lookup that does not seed.
    pub fn peek(&self, id: NodeId) -> Option<bool> {
        self.states.get(&id).copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.states.contains_key(&id)
    }

    /// Flip the state; an unseen identity counts as collapsed and becomes
    /// expanded. Returns the new state.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        let e = self.states.entry(id).or_insert(false);
        *e = !*e;
        *e
    }

    pub fn set(&mut self, id: NodeId, expanded: bool) {
        self.states.insert(id, expanded);
    }

    pub fn reset(&mut self) {
        self.states.clear();
    }

    pub fn force_expand(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        for id in ids {
            self.states.insert(id, true);
        }
    }

    /// Open every object and component in `nodes`. With `only_unseen`, states
    /// already recorded are left as the user set them.
    pub fn expand_containers(&mut self, nodes: &[Node], only_unseen: bool) {
        let mut ids = Vec::new();
        for_each_node(nodes, &mut |n| {
            if n.payload.is_container() && !(only_unseen && self.states.contains_key(&n.id)) {
                ids.push(n.id);
            }
        });
        self.force_expand(ids);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
