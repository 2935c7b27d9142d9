//! DOM Node
//!
//! A node stores only its parent and its ordered child handles. Sibling
//! relations are derived from the parent's child sequence so there are no
//! redundant links to keep consistent across mutations.

use crate::{NamedNodeMap, NodeId};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (None when detached or for the document)
    pub(crate) parent: Option<NodeId>,
    /// Children in insertion order
    pub(crate) children: Vec<NodeId>,
    /// External (script-visible) references keeping a detached node alive
    pub(crate) pins: u32,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            pins: 0,
            data,
        }
    }

    /// Parent handle, if attached
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles in order
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// DOM node type
    pub fn node_type(&self) -> NodeType {
        match &self.data {
            NodeData::Document => NodeType::Document,
            NodeData::Doctype { .. } => NodeType::DocumentType,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
            NodeData::DocumentFragment => NodeType::DocumentFragment,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Whether this node may hold children at all
    pub fn can_have_children(&self) -> bool {
        matches!(
            self.data,
            NodeData::Document | NodeData::Element(_) | NodeData::DocumentFragment
        )
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }

    /// The DOM `nodeName` of this node
    pub fn node_name(&self) -> String {
        match &self.data {
            NodeData::Document => "#document".to_string(),
            NodeData::Doctype { name, .. } => name.clone(),
            NodeData::Element(e) if e.html => e.local_name.to_ascii_uppercase(),
            NodeData::Element(e) => e.local_name.clone(),
            NodeData::Text(_) => "#text".to_string(),
            NodeData::Comment(_) => "#comment".to_string(),
            NodeData::DocumentFragment => "#document-fragment".to_string(),
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
    /// Lightweight container whose children move on insertion
    DocumentFragment,
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Local name, lower-case for HTML elements
    pub local_name: String,
    /// Whether the element lives in the HTML namespace
    pub html: bool,
    /// Attributes in source order
    pub attrs: NamedNodeMap,
}

impl ElementData {
    pub fn new(local_name: &str) -> Self {
        Self {
            local_name: local_name.to_ascii_lowercase(),
            html: true,
            attrs: NamedNodeMap::new(),
        }
    }

    /// Element outside the HTML namespace (SVG, MathML); name kept verbatim
    pub fn foreign(local_name: &str) -> Self {
        Self {
            local_name: local_name.to_string(),
            html: false,
            attrs: NamedNodeMap::new(),
        }
    }

    /// The `id` attribute, if any
    pub fn id(&self) -> Option<&str> {
        self.attrs.get_attribute("id")
    }

    /// Whitespace separated class names
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get_attribute("class")
            .unwrap_or("")
            .split_ascii_whitespace()
    }
}

/// Node type enumeration (DOM `nodeType` values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Element,
    Attribute,
    Text,
    CDataSection,
    ProcessingInstruction,
    Comment,
    Document,
    DocumentType,
    DocumentFragment,
}

impl NodeType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(NodeType::Element),
            2 => Some(NodeType::Attribute),
            3 => Some(NodeType::Text),
            4 => Some(NodeType::CDataSection),
            7 => Some(NodeType::ProcessingInstruction),
            8 => Some(NodeType::Comment),
            9 => Some(NodeType::Document),
            10 => Some(NodeType::DocumentType),
            11 => Some(NodeType::DocumentFragment),
            _ => None,
        }
    }

    pub fn to_u32(self) -> u32 {
        match self {
            NodeType::Element => 1,
            NodeType::Attribute => 2,
            NodeType::Text => 3,
            NodeType::CDataSection => 4,
            NodeType::ProcessingInstruction => 7,
            NodeType::Comment => 8,
            NodeType::Document => 9,
            NodeType::DocumentType => 10,
            NodeType::DocumentFragment => 11,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_conversion() {
        assert_eq!(NodeType::from_u32(1), Some(NodeType::Element));
        assert_eq!(NodeType::Text.to_u32(), 3);
        assert_eq!(NodeType::from_u32(5), None);
        assert_eq!(NodeType::from_u32(11), Some(NodeType::DocumentFragment));
    }

    #[test]
    fn test_node_names() {
        let head = Node::new(NodeData::Element(ElementData::new("head")));
        assert_eq!(head.node_name(), "HEAD");

        let svg = Node::new(NodeData::Element(ElementData::foreign("linearGradient")));
        assert_eq!(svg.node_name(), "linearGradient");

        let text = Node::new(NodeData::Text("  \n ".into()));
        assert_eq!(text.node_name(), "#text");
        assert!(!text.can_have_children());
    }

    #[test]
    fn test_element_classes() {
        let mut elem = ElementData::new("DIV");
        elem.attrs.set_attribute("class", " a  b\tc ");
        assert_eq!(elem.local_name, "div");
        assert_eq!(elem.classes().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(elem.id(), None);
    }
}
