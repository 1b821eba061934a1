use std::collections::HashSet;
use std::fmt::Write as _;
use std::rc::Rc;

use nestview_core::{
    Bounds, ClipVolume, ListConfig, ListError, ListResult, NodeId, Vec3, validate_bounds,
};

use crate::diff;
use crate::expand::ExpansionStore;
use crate::node::{Node, find_node, find_node_mut, for_each_node};
use crate::pool::{RowKey, RowPool};
use crate::row::{
    HighlightFn, LockGetter, LockSetter, PreviewOriginFn, RayOrigin, Row, TransformHandle,
    parse_number_input,
};
use crate::scroll::ListScrollState;
use crate::template::TemplateCache;
use crate::walker::{FrameConditions, FrameSummary, RowHooks, Walker};

/// Fired when the array-size row commits a new value: `(tree, size node)`.
pub type ArraySizeListener = Rc<dyn Fn(&[Node], &Node)>;

/// Renders a lazily expandable tree into a fixed-height viewport by recycling
/// a small pool of rows.
///
/// All state (expansion, template sizes, rows) is owned by the instance and
/// mutated only through its methods; nothing is shared between controllers.
pub struct NestedListController {
    config: ListConfig,
    bounds: Bounds,
    start_position: Vec3,
    clip: ClipVolume,
    data: Vec<Node>,
    expand: ExpansionStore,
    templates: TemplateCache,
    pool: RowPool,
    scroll: ListScrollState,
    hooks: RowHooks,
    array_size_listeners: Vec<ArraySizeListener>,
}

impl NestedListController {
    pub fn new(config: ListConfig, templates: TemplateCache) -> ListResult<Self> {
        config.validate()?;
        let bounds = config.bounds;
        let mut ctrl = Self {
            config,
            bounds,
            start_position: Vec3::ZERO,
            clip: ClipVolume::default(),
            data: Vec::new(),
            expand: ExpansionStore::new(),
            templates,
            pool: RowPool::new(),
            scroll: ListScrollState::new(),
            hooks: RowHooks::default(),
            array_size_listeners: Vec::new(),
        };
        ctrl.compute_conditions();
        Ok(ctrl)
    }

    fn compute_conditions(&mut self) {
        self.start_position = Vec3::BACK * self.bounds.extents().z;
        self.clip = ClipVolume::from_bounds(&self.bounds);
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) -> ListResult<()> {
        validate_bounds(&bounds)?;
        self.bounds = bounds;
        self.compute_conditions();
        Ok(())
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn data(&self) -> &[Node] {
        &self.data
    }

    pub fn templates(&self) -> &TemplateCache {
        &self.templates
    }

    /// Install a data snapshot.
    ///
    /// Same root identities as the current snapshot: a refresh, expansion
    /// states are kept and only unseen objects/components open by default.
    /// Anything else: a new data set, expansion is reset and every object and
    /// component opens. Rows of identities no longer present are released.
    pub fn set_data(&mut self, data: Vec<Node>) -> ListResult<()> {
        let mut seen = HashSet::new();
        validate_nodes(&self.templates, &data, &mut seen)?;

        let refresh = !self.data.is_empty()
            && self.data.len() == data.len()
            && self.data.iter().zip(&data).all(|(a, b)| a.id == b.id);

        if refresh {
            self.expand.expand_containers(&data, true);
        } else {
            self.expand.reset();
            self.expand.expand_containers(&data, false);
        }

        let released = self.pool.retain(|id| seen.contains(&id));
        log::info!(
            "list data {}: {} roots, {} nodes, {} rows released",
            if refresh { "refreshed" } else { "replaced" },
            data.len(),
            seen.len(),
            released
        );
        self.data = data;
        Ok(())
    }

    /// Replace `parent`'s children after the underlying data changed shape
    /// (typically an array resize). The array-size row is carried over.
    pub fn replace_children(&mut self, parent: NodeId, children: Vec<Node>) -> ListResult<()> {
        let old = find_node(&self.data, parent).ok_or(ListError::NodeNotFound(parent))?;

        // Identities outside the replaced subtree must stay unique too.
        let mut replaced = HashSet::new();
        old.for_each_descendant(&mut |n| {
            replaced.insert(n.id);
        });
        let mut seen = HashSet::new();
        for_each_node(&self.data, &mut |n| {
            if !replaced.contains(&n.id) {
                seen.insert(n.id);
            }
        });
        validate_nodes(&self.templates, &children, &mut seen)?;

        diff::before_children_changed(&mut self.pool, old, &children);
        self.expand.expand_containers(&children, true);

        if let Some(node) = find_node_mut(&mut self.data, parent) {
            node.children = Some(children);
        }
        Ok(())
    }

    /// Lay out one frame.
    pub fn update(&mut self) -> ListResult<FrameSummary> {
        if let Some(target) = self.scroll.apply_return() {
            log::debug!("scroll returned to {target}");
        }

        let frame = FrameConditions {
            scroll: self.scroll.offset(),
            viewport: self.bounds.size.z,
            start: self.start_position,
            width: self.bounds.size.x - self.config.clip_margin,
            indent_step: self.config.indent_step,
            clip: self.clip,
        };

        let mut walker = Walker::new(
            &mut self.expand,
            &mut self.templates,
            &mut self.pool,
            &self.hooks,
            frame,
        );
        walker.walk(&self.data, 0)?;
        let (content_extent, last_extent, visible) =
            (walker.offset, walker.last_extent, walker.visible);

        let scroll = self.scroll.offset();
        let mut snap_back = None;
        if content_extent > 0.0 && -scroll > content_extent {
            // Scrolled past the end: bring the last node back into view.
            let target = -content_extent + last_extent;
            log::debug!("scrolled past end ({scroll} beyond {content_extent}); snapping to {target}");
            snap_back = Some(target);
        } else if scroll > 0.0 && self.config.return_to_top {
            snap_back = Some(0.0);
        }
        if let Some(target) = snap_back {
            self.scroll.schedule_return(target);
        }

        Ok(FrameSummary {
            visible,
            content_extent,
            snap_back,
        })
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expand.peek(id).unwrap_or(false)
    }

    /// Flip a node open/closed; takes effect on the next `update`.
    pub fn toggle_expanded(&mut self, id: NodeId) -> bool {
        self.expand.toggle(id)
    }

    pub fn expansion(&self) -> &ExpansionStore {
        &self.expand
    }

    /// Forget every expansion state and re-open objects/components.
    pub fn reset_expansion(&mut self) {
        self.expand.reset();
        self.expand.expand_containers(&self.data, false);
    }

    pub fn scroll(&self) -> &ListScrollState {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut ListScrollState {
        &mut self.scroll
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.offset()
    }

    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll.set_offset(offset);
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll.scroll_by(delta);
    }

    pub fn set_highlight(&mut self, f: impl Fn(NodeId, bool) + 'static) {
        let f: HighlightFn = Rc::new(f);
        self.hooks.set_highlight = Some(f);
        self.push_hooks();
    }

    pub fn set_preview_origin(&mut self, f: impl Fn(RayOrigin) -> Option<TransformHandle> + 'static) {
        let f: PreviewOriginFn = Rc::new(f);
        self.hooks.preview_origin = Some(f);
        self.push_hooks();
    }

    /// Hand the current callbacks to rows already out of the pool.
    fn push_hooks(&mut self) {
        for row in self.pool.rows_mut() {
            row.refresh_hooks(
                self.hooks.set_highlight.clone(),
                self.hooks.preview_origin.clone(),
            );
        }
    }

    pub fn set_lock_hooks(
        &mut self,
        get: impl Fn() -> bool + 'static,
        set: impl Fn(bool) + 'static,
    ) {
        let get: LockGetter = Rc::new(get);
        let set: LockSetter = Rc::new(set);
        self.hooks.get_locked = Some(get);
        self.hooks.set_locked = Some(set);
    }

    pub fn on_array_size_changed(&mut self, f: impl Fn(&[Node], &Node) + 'static) {
        self.array_size_listeners.push(Rc::new(f));
    }

    pub fn row_for(&self, id: NodeId) -> Option<&Row> {
        self.pool.row_for(id)
    }

    pub fn row_key(&self, id: NodeId) -> Option<RowKey> {
        self.pool.key_for(id)
    }

    pub fn pool(&self) -> &RowPool {
        &self.pool
    }

    /// Pointer entered (`true`) or left a row.
    pub fn set_row_hovered(&mut self, id: NodeId, hovered: bool) -> bool {
        match self.pool.key_for(id).and_then(|k| self.pool.row_mut(k)) {
            Some(row) => {
                row.set_hovered(hovered);
                true
            }
            None => false,
        }
    }

    /// Toggle the panel lock from a header row. `None` if `id` has no header row.
    pub fn toggle_lock(&mut self, id: NodeId) -> Option<bool> {
        let key = self.pool.key_for(id)?;
        self.pool.row_mut(key)?.toggle_lock()
    }

    pub fn preview_origin(&self, id: NodeId, ray: RayOrigin) -> Option<TransformHandle> {
        self.pool.row_for(id)?.preview_origin(ray)
    }

    /// Commit text typed into the number row of `id`.
    ///
    /// Malformed input is ignored and leaves the node untouched. A committed
    /// array size notifies the array-size listeners so the host can resize the
    /// array and hand back new children. Returns whether a value was committed.
    pub fn submit_number(&mut self, id: NodeId, input: &str) -> bool {
        let Some(key) = self.pool.key_for(id) else {
            return false;
        };
        let Some(node) = find_node_mut(&mut self.data, id) else {
            return false;
        };
        let Some(payload) = parse_number_input(&node.payload, input, self.config.max_array_size)
        else {
            log::debug!("ignoring malformed input {input:?} for {id}");
            return false;
        };
        if payload == node.payload {
            return false;
        }
        node.payload = payload;

        let Some(row) = self.pool.row_mut(key) else {
            return false;
        };
        row.bind(node);
        if !row.is_array_size_editor() {
            return true;
        }

        if let Some(node) = find_node(&self.data, id) {
            for listener in &self.array_size_listeners {
                listener(&self.data, node);
            }
        }
        true
    }

    /// Text picture of the bound rows in tree order, one per line.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        describe_rows(&self.pool, &self.data, &mut out);
        out
    }

    /// Release every row and cached state. The controller can be reused with
    /// a new data set afterwards.
    pub fn clear(&mut self) {
        self.pool.clear();
        self.expand.reset();
        self.data.clear();
        self.scroll = ListScrollState::new();
    }
}

fn describe_rows(pool: &RowPool, nodes: &[Node], out: &mut String) {
    for node in nodes {
        if let Some(row) = pool.row_for(node.id) {
            let marker = if !node.has_children() {
                '-'
            } else if row.is_expanded() {
                'v'
            } else {
                '>'
            };
            let _ = writeln!(
                out,
                "{:indent$}{marker} {} {} z={:.2}",
                "",
                node.payload.label(),
                node.id,
                row.position().z,
                indent = row.depth() * 2
            );
        }
        describe_rows(pool, node.children(), out);
    }
}

fn validate_nodes(
    templates: &TemplateCache,
    nodes: &[Node],
    seen: &mut HashSet<NodeId>,
) -> ListResult<()> {
    for n in nodes {
        if !templates.contains(&n.template) {
            return Err(ListError::UnknownTemplate(n.template.clone()));
        }
        if !seen.insert(n.id) {
            return Err(ListError::DuplicateNode(n.id));
        }
        validate_nodes(templates, n.children(), seen)?;
    }
    Ok(())
}
