use crate::node::Node;
use crate::pool::{RowKey, RowPool};
use crate::row::Row;

/// Reconcile rows before `parent`'s children are replaced by `new_children`.
///
/// Every old child row is released together with its subtree, except a row
/// editing the array size: that row may be mid-drag, so it is moved onto the
/// array-size node of the new set (matched by role, the identity may differ)
/// instead of being torn down. Returns the row that was carried over.
pub(crate) fn before_children_changed(
    pool: &mut RowPool,
    parent: &Node,
    new_children: &[Node],
) -> Option<RowKey> {
    let mut size_row = None;

    for child in parent.children() {
        let key = pool.key_for(child.id);
        let is_size_editor = key
            .and_then(|k| pool.row(k))
            .is_some_and(Row::is_array_size_editor);

        if is_size_editor && size_row.is_none() {
            size_row = key;
        } else {
            pool.recycle(child.id);
        }
        pool.recycle_children(child);
    }

    let key = size_row?;
    let template = pool.row(key).map(|r| r.template().to_string());
    let target = new_children
        .iter()
        .find(|c| c.payload.is_array_size() && Some(&c.template) == template.as_ref());

    match target {
        Some(node) => {
            log::debug!("keeping array-size row for {} across child change", node.id);
            pool.rebind(key, node);
            Some(key)
        }
        None => {
            if let Some(id) = pool.row(key).and_then(Row::node) {
                pool.recycle(id);
            }
            None
        }
    }
}
