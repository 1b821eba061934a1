use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use nestview_core::{Bounds, ListConfig, ListError, ListResult, NodeId};
use nestview_list::{
    FrameSummary, NestedListController, Node, NodePayload, PropertyValue, TemplateCache,
    find_node, for_each_node,
};

use crate::workspace::{Workspace, WorkspaceError};

/// Pending array resize: `(array node, requested length)`.
type ResizeQueue = Rc<RefCell<Vec<(NodeId, usize)>>>;

/// Inspector panel: a nested list of the selected object's components and
/// properties, with a lock that freezes the current selection.
pub struct InspectorWorkspace {
    list: NestedListController,
    locked: Rc<Cell<bool>>,
    resizes: ResizeQueue,
    /// Template for elements added to an array that had none to copy.
    element_template: String,
    next_id: i64,
}

impl InspectorWorkspace {
    pub fn new(
        config: ListConfig,
        templates: TemplateCache,
        element_template: impl Into<String>,
    ) -> ListResult<Self> {
        Ok(Self {
            list: NestedListController::new(config, templates)?,
            locked: Rc::new(Cell::new(false)),
            resizes: Rc::new(RefCell::new(Vec::new())),
            element_template: element_template.into(),
            next_id: 0,
        })
    }

    pub fn list(&self) -> &NestedListController {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut NestedListController {
        &mut self.list
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked.set(locked);
    }

    /// Show a new selection. Ignored while the panel is locked; returns
    /// whether the data was taken.
    pub fn inspect(&mut self, data: Vec<Node>) -> ListResult<bool> {
        if self.locked.get() {
            log::debug!("inspector locked; selection change ignored");
            return Ok(false);
        }
        self.next_id = next_free_id(&data);
        self.list.set_data(data)?;
        // Resizes queued against the previous selection have nothing to act on.
        self.resizes.borrow_mut().clear();
        Ok(true)
    }

    /// Service queued array resizes, then lay out one frame. A resize that
    /// can no longer be applied is dropped; the frame still runs.
    pub fn frame(&mut self) -> ListResult<FrameSummary> {
        let pending: Vec<_> = self.resizes.borrow_mut().drain(..).collect();
        for (array, len) in pending {
            if let Err(e) = self.resize_array(array, len) {
                log::warn!("dropping resize of array {array} to {len}: {e}");
            }
        }
        self.list.update()
    }

    fn resize_array(&mut self, array: NodeId, len: usize) -> ListResult<()> {
        let max = self.list.config().max_array_size;
        let capacity = len
            .checked_add(1)
            .filter(|_| len <= max)
            .ok_or(ListError::ArrayTooLarge { len, max })?;
        let node = find_node(self.list.data(), array).ok_or(ListError::NodeNotFound(array))?;
        let size_template = node
            .children()
            .iter()
            .find(|c| c.payload.is_array_size())
            .map(|c| c.template.clone())
            .ok_or(ListError::NodeNotFound(array))?;
        let path = match &node.payload {
            NodePayload::Property { path, .. } => path.clone(),
            _ => String::new(),
        };
        let elements: Vec<Node> = node
            .children()
            .iter()
            .filter(|c| !c.payload.is_array_size())
            .cloned()
            .collect();
        let (template, value) = match elements.last() {
            Some(Node {
                template,
                payload: NodePayload::Property { value, .. },
                ..
            }) => (template.clone(), value.clone()),
            _ => (self.element_template.clone(), PropertyValue::Generic),
        };
        let old_len = elements.len();

        // The size field comes back under a fresh identity, the way a
        // re-serialized property would; the diff handler carries its row over.
        let mut children = Vec::with_capacity(capacity);
        children.push(Node::array_size(self.fresh_id(), size_template, array, len));
        children.extend(elements.into_iter().take(len));
        for i in old_len..len {
            children.push(Node::property(
                self.fresh_id(),
                template.clone(),
                format!("{path}.Array.data[{i}]"),
                value.clone(),
            ));
        }

        log::info!("array {array} resized {old_len} -> {len}");
        self.list.replace_children(array, children)
    }

    fn fresh_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }
}

fn next_free_id(data: &[Node]) -> i64 {
    let mut max = 0;
    for_each_node(data, &mut |n| max = max.max(n.id.0));
    max + 1
}

impl Workspace for InspectorWorkspace {
    fn setup(&mut self) -> Result<(), WorkspaceError> {
        if !self.list.templates().contains(&self.element_template) {
            return Err(ListError::UnknownTemplate(self.element_template.clone()).into());
        }

        let (get, set) = (self.locked.clone(), self.locked.clone());
        self.list.set_lock_hooks(move || get.get(), move |v| set.set(v));

        let queue = self.resizes.clone();
        self.list.on_array_size_changed(move |_, node| {
            if let NodePayload::ArraySize { array, len } = &node.payload {
                queue.borrow_mut().push((*array, *len));
            }
        });
        Ok(())
    }

    fn vacuum_bounds(&self) -> Bounds {
        self.list.bounds()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
