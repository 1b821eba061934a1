use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;
use nestview_core::{ClipVolume, NodeId, Vec3};

use crate::node::{Node, NodePayload, PropertyValue};
use crate::template::RowRole;

/// Host handle for a pointer/ray source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RayOrigin(pub u32);

/// Host handle for a transform that anchors preview UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransformHandle(pub u64);

pub type HighlightFn = Rc<dyn Fn(NodeId, bool)>;
pub type PreviewOriginFn = Rc<dyn Fn(RayOrigin) -> Option<TransformHandle>>;
pub type LockGetter = Rc<dyn Fn() -> bool>;
pub type LockSetter = Rc<dyn Fn(bool)>;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct RowFlags: u8 {
        /// One-time callback wiring done; survives recycling.
        const SETUP = 1;
        const EXPANDED = 1 << 1;
        const EXPANDABLE = 1 << 2;
        const HIGHLIGHTED = 1 << 3;
    }
}

/// Per-kind row state. The pool and the diff handler inspect this tag.
#[derive(Clone, Debug, PartialEq)]
pub enum RowKind {
    Header { locked: bool },
    Number { array_size: bool, text: String },
    Plain,
}

impl RowKind {
    fn for_role(role: RowRole) -> Self {
        match role {
            RowRole::Header => RowKind::Header { locked: false },
            RowRole::Number => RowKind::Number {
                array_size: false,
                text: String::new(),
            },
            RowRole::Plain => RowKind::Plain,
        }
    }
}

/// Visual representation of one visible node. Owned by the row pool.
pub struct Row {
    template: String,
    kind: RowKind,
    node: Option<NodeId>,
    depth: usize,
    position: Vec3,
    width: f32,
    indent: f32,
    clip: ClipVolume,
    flags: RowFlags,
    set_highlight: Option<HighlightFn>,
    preview_origin: Option<PreviewOriginFn>,
    set_locked: Option<LockSetter>,
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("template", &self.template)
            .field("kind", &self.kind)
            .field("node", &self.node)
            .field("depth", &self.depth)
            .field("position", &self.position)
            .field("flags", &self.flags)
            .finish()
    }
}

impl Row {
    pub fn new(template: impl Into<String>, role: RowRole) -> Self {
        Self {
            template: template.into(),
            kind: RowKind::for_role(role),
            node: None,
            depth: 0,
            position: Vec3::ZERO,
            width: 0.0,
            indent: 0.0,
            clip: ClipVolume::default(),
            flags: RowFlags::empty(),
            set_highlight: None,
            preview_origin: None,
            set_locked: None,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn kind(&self) -> &RowKind {
        &self.kind
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn indent(&self) -> f32 {
        self.indent
    }

    pub fn clip(&self) -> ClipVolume {
        self.clip
    }

    pub fn flags(&self) -> RowFlags {
        self.flags
    }

    pub fn is_setup(&self) -> bool {
        self.flags.contains(RowFlags::SETUP)
    }

    pub fn is_expanded(&self) -> bool {
        self.flags.contains(RowFlags::EXPANDED)
    }

    /// True for a number row currently editing an array's size.
    pub fn is_array_size_editor(&self) -> bool {
        matches!(self.kind, RowKind::Number { array_size: true, .. })
    }

    /// Marks the row as wired; happens on its first acquisition only.
    pub(crate) fn setup(&mut self) {
        self.flags.insert(RowFlags::SETUP);
    }

    /// Re-read the highlight and preview-origin callbacks; called on every
    /// acquisition so hooks registered later still reach reused rows.
    pub(crate) fn refresh_hooks(
        &mut self,
        highlight: Option<HighlightFn>,
        preview: Option<PreviewOriginFn>,
    ) {
        self.set_highlight = highlight;
        self.preview_origin = preview;
    }

    /// Refresh lock state on header rows; called on every acquisition.
    pub(crate) fn refresh_lock(&mut self, get: Option<&LockGetter>, set: Option<&LockSetter>) {
        if let RowKind::Header { locked } = &mut self.kind {
            *locked = get.map(|g| g()).unwrap_or(false);
            self.set_locked = set.cloned();
        }
    }

    /// Point this row at `node` and refresh per-node data.
    pub(crate) fn bind(&mut self, node: &Node) {
        self.node = Some(node.id);
        if let RowKind::Number { array_size, text } = &mut self.kind {
            *array_size = node.payload.is_array_size();
            *text = number_text(&node.payload);
        }
    }

    pub(crate) fn unbind(&mut self) {
        if self.flags.contains(RowFlags::HIGHLIGHTED) {
            if let (Some(cb), Some(id)) = (&self.set_highlight, self.node) {
                cb(id, false);
            }
        }
        self.node = None;
        self.flags
            .remove(RowFlags::EXPANDED | RowFlags::EXPANDABLE | RowFlags::HIGHLIGHTED);
    }

    pub(crate) fn update_self(
        &mut self,
        width: f32,
        depth: usize,
        indent_step: f32,
        expanded: bool,
        expandable: bool,
    ) {
        self.width = width;
        self.depth = depth;
        self.indent = depth as f32 * indent_step;
        self.flags.set(RowFlags::EXPANDED, expanded);
        self.flags.set(RowFlags::EXPANDABLE, expandable);
    }

    pub(crate) fn place(&mut self, position: Vec3, clip: ClipVolume) {
        self.position = position;
        self.clip = clip;
    }

    pub(crate) fn set_hovered(&mut self, hovered: bool) {
        if self.flags.contains(RowFlags::HIGHLIGHTED) == hovered {
            return;
        }
        self.flags.set(RowFlags::HIGHLIGHTED, hovered);
        if let (Some(cb), Some(id)) = (&self.set_highlight, self.node) {
            cb(id, hovered);
        }
    }

    /// Flip the header lock through the host setter. Returns the new state.
    pub(crate) fn toggle_lock(&mut self) -> Option<bool> {
        let RowKind::Header { locked } = &mut self.kind else {
            return None;
        };
        *locked = !*locked;
        if let Some(set) = &self.set_locked {
            set(*locked);
        }
        Some(*locked)
    }

    pub fn preview_origin(&self, ray: RayOrigin) -> Option<TransformHandle> {
        self.preview_origin.as_ref().and_then(|f| f(ray))
    }
}

fn number_text(payload: &NodePayload) -> String {
    match payload {
        NodePayload::ArraySize { len, .. } => len.to_string(),
        NodePayload::Property { value, .. } => match value {
            PropertyValue::Integer(v) => v.to_string(),
            PropertyValue::Float(v) => v.to_string(),
            PropertyValue::Bool(v) => v.to_string(),
            PropertyValue::Text(s) => s.clone(),
            PropertyValue::Generic => String::new(),
        },
        _ => String::new(),
    }
}

/// Parse text typed into a number row. `None` means "ignore the edit"; array
/// sizes above `max_array_size` are ignored too.
pub fn parse_number_input(
    payload: &NodePayload,
    input: &str,
    max_array_size: usize,
) -> Option<NodePayload> {
    let input = input.trim();
    match payload {
        NodePayload::ArraySize { array, .. } => input
            .parse::<usize>()
            .ok()
            .filter(|len| *len <= max_array_size)
            .map(|len| NodePayload::ArraySize { array: *array, len }),
        NodePayload::Property { path, label, value } => {
            let value = match value {
                PropertyValue::Integer(_) => PropertyValue::Integer(input.parse().ok()?),
                PropertyValue::Float(_) => {
                    let v: f64 = input.parse().ok()?;
                    if !v.is_finite() {
                        return None;
                    }
                    PropertyValue::Float(v)
                }
                _ => return None,
            };
            Some(NodePayload::Property {
                path: path.clone(),
                label: label.clone(),
                value,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_bind_refreshes_number_data() {
        let mut row = Row::new("number", RowRole::Number);
        row.bind(&Node::array_size(5, "number", NodeId(4), 3));
        assert!(row.is_array_size_editor());
        assert_eq!(
            row.kind(),
            &RowKind::Number {
                array_size: true,
                text: "3".into()
            }
        );

        row.bind(&Node::property(6, "number", "m_Count", PropertyValue::Integer(12)));
        assert!(!row.is_array_size_editor());
    }

    #[test]
    fn test_hover_calls_highlight_once_per_change() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut row = Row::new("plain", RowRole::Plain);
        let l = log.clone();
        row.refresh_hooks(Some(Rc::new(move |id, on| l.borrow_mut().push((id, on)))), None);
        row.bind(&Node::object(1, "plain", "Cube"));

        row.set_hovered(true);
        row.set_hovered(true);
        row.unbind();
        assert_eq!(*log.borrow(), vec![(NodeId(1), true), (NodeId(1), false)]);
    }

    #[test]
    fn test_toggle_lock_only_on_headers() {
        let locked = Rc::new(RefCell::new(false));
        let mut header = Row::new("header", RowRole::Header);
        let get: LockGetter = {
            let l = locked.clone();
            Rc::new(move || *l.borrow())
        };
        let set: LockSetter = {
            let l = locked.clone();
            Rc::new(move |v| *l.borrow_mut() = v)
        };
        header.refresh_lock(Some(&get), Some(&set));
        assert_eq!(header.toggle_lock(), Some(true));
        assert!(*locked.borrow());

        let mut plain = Row::new("plain", RowRole::Plain);
        assert_eq!(plain.toggle_lock(), None);
    }

    #[test]
    fn test_parse_number_input_rejects_garbage() {
        let size = NodePayload::ArraySize {
            array: NodeId(1),
            len: 2,
        };
        assert_eq!(
            parse_number_input(&size, " 4 ", 100),
            Some(NodePayload::ArraySize {
                array: NodeId(1),
                len: 4
            })
        );
        assert_eq!(parse_number_input(&size, "-1", 100), None);
        assert_eq!(parse_number_input(&size, "4x", 100), None);

        let float = Node::property(2, "n", "m_Mass", PropertyValue::Float(1.0)).payload;
        assert!(parse_number_input(&float, "NaN", 100).is_none());
        assert!(parse_number_input(&float, "2.5", 100).is_some());
    }

    #[test]
    fn test_parse_array_size_respects_limit() {
        let size = NodePayload::ArraySize {
            array: NodeId(1),
            len: 2,
        };
        assert!(parse_number_input(&size, "100", 100).is_some());
        assert_eq!(parse_number_input(&size, "101", 100), None);
        assert_eq!(parse_number_input(&size, "18446744073709551615", 100), None);
        assert_eq!(parse_number_input(&size, "18446744073709551616", 100), None);
    }
}
