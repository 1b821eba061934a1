use std::collections::HashMap;

use nestview_core::NodeId;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::node::Node;
use crate::row::Row;
use crate::template::RowRole;

new_key_type! {
    /// Handle to a row owned by a [`RowPool`].
    pub struct RowKey;
}

/// Owns every row a controller ever created. Rows are bound to at most one
/// node identity at a time and go back to a per-template free list when
/// released; they are only destroyed by `clear`.
#[derive(Debug, Default)]
pub struct RowPool {
    rows: SlotMap<RowKey, Row>,
    bound: HashMap<NodeId, RowKey>,
    free: HashMap<String, SmallVec<[RowKey; 8]>>,
    created: usize,
}

impl RowPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row bound to `node`, reusing a released row of the same template or
    /// creating one when none is free.
    pub fn get(&mut self, node: &Node, role: RowRole) -> RowKey {
        if let Some(&key) = self.bound.get(&node.id) {
            match self.rows.get(key) {
                Some(row) if row.template() == node.template => return key,
                // Same identity, different template: start over with a fresh kind.
                Some(_) => {
                    self.recycle(node.id);
                }
                None => {
                    self.bound.remove(&node.id);
                }
            }
        }

        let reused = self
            .free
            .get_mut(node.template.as_str())
            .and_then(|free| free.pop());
        let key = match reused {
            Some(key) => key,
            None => {
                self.created += 1;
                log::debug!(
                    "row pool: creating `{}` row for {} ({} rows total)",
                    node.template,
                    node.id,
                    self.rows.len() + 1
                );
                self.rows.insert(Row::new(node.template.clone(), role))
            }
        };

        self.rows[key].bind(node);
        self.bound.insert(node.id, key);
        key
    }

    /// Release the row bound to `id`. No-op when nothing is bound.
    pub fn recycle(&mut self, id: NodeId) -> bool {
        let Some(key) = self.bound.remove(&id) else {
            return false;
        };
        let Some(row) = self.rows.get_mut(key) else {
            return false;
        };
        row.unbind();
        self.free
            .entry(row.template().to_string())
            .or_default()
            .push(key);
        true
    }

    /// Release the rows of every descendant of `node`, however deep.
    pub fn recycle_children(&mut self, node: &Node) -> usize {
        let mut released = 0;
        node.for_each_descendant(&mut |n| {
            if self.recycle(n.id) {
                released += 1;
            }
        });
        released
    }

    /// Move an existing row onto `node` without going through the free list.
    /// Whatever row `node` had before is released first.
    pub fn rebind(&mut self, key: RowKey, node: &Node) {
        let Some(previous) = self.rows.get(key).and_then(Row::node) else {
            return;
        };
        if previous != node.id {
            self.bound.remove(&previous);
            self.recycle(node.id);
        }
        self.rows[key].bind(node);
        self.bound.insert(node.id, key);
    }

    /// Release every bound row whose identity fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) -> usize {
        let stale: Vec<NodeId> = self.bound.keys().copied().filter(|id| !keep(*id)).collect();
        for id in &stale {
            self.recycle(*id);
        }
        stale.len()
    }

    pub fn key_for(&self, id: NodeId) -> Option<RowKey> {
        self.bound.get(&id).copied()
    }

    pub fn row_for(&self, id: NodeId) -> Option<&Row> {
        self.key_for(id).and_then(|k| self.rows.get(k))
    }

    pub fn row(&self, key: RowKey) -> Option<&Row> {
        self.rows.get(key)
    }

    pub fn row_mut(&mut self, key: RowKey) -> Option<&mut Row> {
        self.rows.get_mut(key)
    }

    pub fn bound(&self) -> impl Iterator<Item = (NodeId, &Row)> + '_ {
        self.bound
            .iter()
            .filter_map(|(id, key)| self.rows.get(*key).map(|row| (*id, row)))
    }

    /// Every row the pool owns, bound or free.
    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> + '_ {
        self.rows.values_mut()
    }

    pub fn bound_len(&self) -> usize {
        self.bound.len()
    }

    pub fn free_len(&self) -> usize {
        self.free.values().map(|f| f.len()).sum()
    }

    /// Rows alive in the pool, bound or not.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows created over the pool's lifetime.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Destroy every row. Used on controller teardown.
    pub fn clear(&mut self) {
        let ids: Vec<NodeId> = self.bound.keys().copied().collect();
        for id in ids {
            self.recycle(id);
        }
        self.rows.clear();
        self.free.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::PropertyValue;

    fn leaf(id: i64, template: &str) -> Node {
        Node::property(id, template, format!("p{id}"), PropertyValue::Integer(id))
    }

    #[test]
    fn test_get_returns_same_row_for_same_identity() {
        let mut pool = RowPool::new();
        let a = pool.get(&leaf(1, "plain"), RowRole::Plain);
        let b = pool.get(&leaf(1, "plain"), RowRole::Plain);
        assert_eq!(a, b);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_recycle_is_idempotent() {
        let mut pool = RowPool::new();
        pool.get(&leaf(1, "plain"), RowRole::Plain);
        assert!(pool.recycle(NodeId(1)));
        let (len, bound, free) = (pool.len(), pool.bound_len(), pool.free_len());
        assert!(!pool.recycle(NodeId(1)));
        assert_eq!((pool.len(), pool.bound_len(), pool.free_len()), (len, bound, free));
    }

    #[test]
    fn test_released_row_is_reused_by_same_template_only() {
        let mut pool = RowPool::new();
        let a = pool.get(&leaf(1, "plain"), RowRole::Plain);
        pool.recycle(NodeId(1));

        let other = pool.get(&leaf(2, "number"), RowRole::Number);
        assert_ne!(a, other);
        let reused = pool.get(&leaf(3, "plain"), RowRole::Plain);
        assert_eq!(a, reused);
        assert_eq!(pool.row(reused).and_then(Row::node), Some(NodeId(3)));
        assert_eq!(pool.created(), 2);
    }

    #[test]
    fn test_template_change_for_identity_swaps_row() {
        let mut pool = RowPool::new();
        let a = pool.get(&leaf(1, "plain"), RowRole::Plain);
        let b = pool.get(&leaf(1, "number"), RowRole::Number);
        assert_ne!(a, b);
        assert_eq!(pool.bound_len(), 1);
        assert_eq!(pool.free_len(), 1);
    }

    #[test]
    fn test_recycle_children_is_recursive() {
        let tree = Node::object(1, "h", "Root").with_children(vec![
            leaf(2, "plain").with_children(vec![leaf(3, "plain")]),
            leaf(4, "plain"),
        ]);
        let mut pool = RowPool::new();
        pool.get(&tree, RowRole::Header);
        for id in [2, 3, 4] {
            pool.get(&leaf(id, "plain"), RowRole::Plain);
        }
        assert_eq!(pool.recycle_children(&tree), 3);
        assert_eq!(pool.bound_len(), 1);
        assert!(pool.row_for(NodeId(1)).is_some());
    }

    #[test]
    fn test_rebind_moves_row_and_releases_previous_owner() {
        let mut pool = RowPool::new();
        let size = pool.get(&Node::array_size(10, "number", NodeId(9), 2), RowRole::Number);
        let stale = pool.get(&leaf(11, "number"), RowRole::Number);

        pool.rebind(size, &leaf(11, "number"));
        assert_eq!(pool.key_for(NodeId(11)), Some(size));
        assert_eq!(pool.key_for(NodeId(10)), None);
        assert_eq!(pool.row(stale).and_then(Row::node), None);
        assert_eq!(pool.bound_len(), 1);
    }

    #[test]
    fn test_retain_releases_missing_identities() {
        let mut pool = RowPool::new();
        for id in 1..=4 {
            pool.get(&leaf(id, "plain"), RowRole::Plain);
        }
        assert_eq!(pool.retain(|id| id.0 % 2 == 0), 2);
        assert_eq!(pool.bound_len(), 2);
        assert_eq!(pool.len(), 4);
    }
}
