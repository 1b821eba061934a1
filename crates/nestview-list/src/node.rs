use nestview_core::NodeId;

/// Current value of an inspected property.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Arrays and nested structs; the value lives in the children.
    Generic,
}

/// Kind-specific part of a node. Pool and diff handler dispatch on this tag.
#[derive(Clone, Debug, PartialEq)]
pub enum NodePayload {
    Object { name: String },
    Component { type_name: String },
    Property {
        path: String,
        label: String,
        value: PropertyValue,
    },
    /// The size field of an array property. `array` is the owning array node.
    ArraySize { array: NodeId, len: usize },
}

impl NodePayload {
    /// Objects and components open by default when a data set is installed.
    pub fn is_container(&self) -> bool {
        matches!(self, NodePayload::Object { .. } | NodePayload::Component { .. })
    }

    pub fn is_array_size(&self) -> bool {
        matches!(self, NodePayload::ArraySize { .. })
    }

    pub fn label(&self) -> &str {
        match self {
            NodePayload::Object { name } => name,
            NodePayload::Component { type_name } => type_name,
            NodePayload::Property { label, .. } => label,
            NodePayload::ArraySize { .. } => "Size",
        }
    }
}

/// One element of the inspected tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Template kind; selects the row representation and its cached size.
    pub template: String,
    pub payload: NodePayload,
    pub children: Option<Vec<Node>>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, template: impl Into<String>, payload: NodePayload) -> Self {
        Self {
            id: id.into(),
            template: template.into(),
            payload,
            children: None,
        }
    }

    pub fn object(id: impl Into<NodeId>, template: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, template, NodePayload::Object { name: name.into() })
    }

    pub fn component(
        id: impl Into<NodeId>,
        template: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            template,
            NodePayload::Component {
                type_name: type_name.into(),
            },
        )
    }

    pub fn property(
        id: impl Into<NodeId>,
        template: impl Into<String>,
        path: impl Into<String>,
        value: PropertyValue,
    ) -> Self {
        let path = path.into();
        let label = path.rsplit('.').next().unwrap_or(&path).to_string();
        Self::new(id, template, NodePayload::Property { path, label, value })
    }

    pub fn array_size(
        id: impl Into<NodeId>,
        template: impl Into<String>,
        array: NodeId,
        len: usize,
    ) -> Self {
        Self::new(id, template, NodePayload::ArraySize { array, len })
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// Pre-order visit of this node's descendants (not the node itself).
    pub fn for_each_descendant(&self, f: &mut impl FnMut(&Node)) {
        for c in self.children() {
            f(c);
            c.for_each_descendant(f);
        }
    }
}

/// Pre-order visit of every node in a forest.
pub fn for_each_node(nodes: &[Node], f: &mut impl FnMut(&Node)) {
    for n in nodes {
        f(n);
        n.for_each_descendant(f);
    }
}

pub fn find_node(nodes: &[Node], id: NodeId) -> Option<&Node> {
    for n in nodes {
        if n.id == id {
            return Some(n);
        }
        if let Some(found) = find_node(n.children(), id) {
            return Some(found);
        }
    }
    None
}

pub fn find_node_mut(nodes: &mut [Node], id: NodeId) -> Option<&mut Node> {
    for n in nodes.iter_mut() {
        if n.id == id {
            return Some(n);
        }
        if let Some(children) = n.children.as_deref_mut() {
            if let Some(found) = find_node_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Node> {
        vec![
            Node::object(1, "header", "Cube").with_children(vec![
                Node::component(2, "header", "Transform").with_children(vec![
                    Node::property(3, "vector", "m_LocalPosition", PropertyValue::Generic),
                ]),
            ]),
            Node::object(4, "header", "Light"),
        ]
    }

    #[test]
    fn test_find_node_descends() {
        let data = sample();
        assert_eq!(find_node(&data, NodeId(3)).map(|n| n.payload.label()), Some("m_LocalPosition"));
        assert!(find_node(&data, NodeId(99)).is_none());
    }

    #[test]
    fn test_find_node_mut_allows_edit() {
        let mut data = sample();
        find_node_mut(&mut data, NodeId(2)).unwrap().children = None;
        assert!(find_node(&data, NodeId(3)).is_none());
    }

    #[test]
    fn test_for_each_node_is_preorder() {
        let mut seen = Vec::new();
        for_each_node(&sample(), &mut |n| seen.push(n.id.0));
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_property_label_is_last_path_segment() {
        let n = Node::property(9, "number", "m_Items.Array.size", PropertyValue::Integer(2));
        assert_eq!(n.payload.label(), "size");
        assert!(NodePayload::ArraySize { array: NodeId(1), len: 0 }.is_array_size());
        assert!(!n.payload.is_container());
    }
}
