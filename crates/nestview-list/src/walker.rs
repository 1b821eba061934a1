use nestview_core::{ClipVolume, ListError, ListResult, NodeId, Vec3};

use crate::expand::ExpansionStore;
use crate::node::Node;
use crate::pool::{RowKey, RowPool};
use crate::row::{HighlightFn, LockGetter, LockSetter, PreviewOriginFn};
use crate::template::TemplateCache;

/// Host callbacks handed to rows.
#[derive(Clone, Default)]
pub struct RowHooks {
    pub set_highlight: Option<HighlightFn>,
    pub preview_origin: Option<PreviewOriginFn>,
    pub get_locked: Option<LockGetter>,
    pub set_locked: Option<LockSetter>,
}

/// One node that ended up on screen this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleNode {
    pub id: NodeId,
    /// Distance from the top of the content along the scroll axis.
    pub offset: f32,
    pub extent: f32,
    pub depth: usize,
}

/// What one `update` did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameSummary {
    pub visible: Vec<VisibleNode>,
    /// Extent of everything reachable through expanded nodes.
    pub content_extent: f32,
    /// Scroll return scheduled for the next frame, if any.
    pub snap_back: Option<f32>,
}

impl FrameSummary {
    pub fn visible_ids(&self) -> Vec<NodeId> {
        self.visible.iter().map(|v| v.id).collect()
    }
}

/// Per-frame layout inputs.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FrameConditions {
    pub scroll: f32,
    pub viewport: f32,
    pub start: Vec3,
    pub width: f32,
    pub indent_step: f32,
    pub clip: ClipVolume,
}

/// Row for `node`, wiring host callbacks the first time a row is produced and
/// re-reading the lock state whenever a node (re)acquires a row.
pub(crate) fn acquire(
    pool: &mut RowPool,
    templates: &TemplateCache,
    hooks: &RowHooks,
    node: &Node,
) -> ListResult<RowKey> {
    let role = templates
        .role(&node.template)
        .ok_or_else(|| ListError::UnknownTemplate(node.template.clone()))?;

    let was_bound = pool
        .row_for(node.id)
        .is_some_and(|row| row.template() == node.template);
    let key = pool.get(node, role);

    if let Some(row) = pool.row_mut(key) {
        if was_bound {
            row.bind(node);
        } else {
            row.refresh_lock(hooks.get_locked.as_ref(), hooks.set_locked.as_ref());
        }
        row.refresh_hooks(hooks.set_highlight.clone(), hooks.preview_origin.clone());
        if !row.is_setup() {
            row.setup();
        }
    }
    Ok(key)
}

/// Depth-first pre-order walk that lays out visible nodes and releases rows of
/// everything off screen or collapsed.
pub(crate) struct Walker<'a> {
    pub expand: &'a mut ExpansionStore,
    pub templates: &'a mut TemplateCache,
    pub pool: &'a mut RowPool,
    pub hooks: &'a RowHooks,
    pub frame: FrameConditions,
    pub offset: f32,
    /// Extent of the last node walked; sizes the snap-back.
    pub last_extent: f32,
    pub visible: Vec<VisibleNode>,
}

impl<'a> Walker<'a> {
    pub fn new(
        expand: &'a mut ExpansionStore,
        templates: &'a mut TemplateCache,
        pool: &'a mut RowPool,
        hooks: &'a RowHooks,
        frame: FrameConditions,
    ) -> Self {
        Self {
            expand,
            templates,
            pool,
            hooks,
            frame,
            offset: 0.0,
            last_extent: 0.0,
            visible: Vec::new(),
        }
    }

    pub fn walk(&mut self, nodes: &[Node], depth: usize) -> ListResult<()> {
        for node in nodes {
            let expanded = self.expand.is_expanded(node.id);
            let extent = self.templates.size_of(&node.template)?.z;
            self.last_extent = extent;

            let top = self.offset + self.frame.scroll;
            if top + extent < 0.0 || top > self.frame.viewport {
                self.pool.recycle(node.id);
            } else {
                self.render(node, depth, expanded, extent)?;
            }

            self.offset += extent;

            if node.children.is_some() {
                if expanded {
                    self.walk(node.children(), depth + 1)?;
                } else {
                    self.pool.recycle_children(node);
                }
            }
        }
        Ok(())
    }

    fn render(&mut self, node: &Node, depth: usize, expanded: bool, extent: f32) -> ListResult<()> {
        let key = acquire(&mut *self.pool, &*self.templates, self.hooks, node)?;
        let f = self.frame;
        if let Some(row) = self.pool.row_mut(key) {
            row.update_self(f.width, depth, f.indent_step, expanded, node.has_children());
            let across = Vec3::RIGHT * row.indent();
            let along = Vec3::FORWARD * (self.offset + f.scroll);
            row.place(f.start + across + along, f.clip);
        }
        self.visible.push(VisibleNode {
            id: node.id,
            offset: self.offset,
            extent,
            depth,
        });
        Ok(())
    }
}
