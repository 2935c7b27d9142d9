//! Node filtering
//!
//! `NodeFilter`-style selection over a subtree. The result of a selection is
//! a [`StaticNodeList`], taken in NodeIterator order: pre-order, root
//! included. As with NodeIterator, `Reject` and `Skip` both drop the node
//! itself and traversal still descends into its children.

use crate::{NodeId, NodeStore, NodeType, StaticNodeList};

/// What types of nodes to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhatToShow(u32);

impl WhatToShow {
    pub const ALL: WhatToShow = WhatToShow(0xFFFFFFFF);
    pub const ELEMENT: WhatToShow = WhatToShow(0x1);
    pub const ATTRIBUTE: WhatToShow = WhatToShow(0x2);
    pub const TEXT: WhatToShow = WhatToShow(0x4);
    pub const CDATA_SECTION: WhatToShow = WhatToShow(0x8);
    pub const PROCESSING_INSTRUCTION: WhatToShow = WhatToShow(0x40);
    pub const COMMENT: WhatToShow = WhatToShow(0x80);
    pub const DOCUMENT: WhatToShow = WhatToShow(0x100);
    pub const DOCUMENT_TYPE: WhatToShow = WhatToShow(0x200);
    pub const DOCUMENT_FRAGMENT: WhatToShow = WhatToShow(0x400);

    pub const fn from_bits(bits: u32) -> Self {
        WhatToShow(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check if a node type is shown
    pub fn includes(self, node_type: NodeType) -> bool {
        let flag = match node_type {
            NodeType::Element => Self::ELEMENT.0,
            NodeType::Attribute => Self::ATTRIBUTE.0,
            NodeType::Text => Self::TEXT.0,
            NodeType::CDataSection => Self::CDATA_SECTION.0,
            NodeType::ProcessingInstruction => Self::PROCESSING_INSTRUCTION.0,
            NodeType::Comment => Self::COMMENT.0,
            NodeType::Document => Self::DOCUMENT.0,
            NodeType::DocumentType => Self::DOCUMENT_TYPE.0,
            NodeType::DocumentFragment => Self::DOCUMENT_FRAGMENT.0,
        };
        (self.0 & flag) != 0
    }

    /// Union of two WhatToShow filters
    pub fn or(self, other: WhatToShow) -> WhatToShow {
        WhatToShow(self.0 | other.0)
    }
}

impl Default for WhatToShow {
    fn default() -> Self {
        Self::ALL
    }
}

/// Node filter result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    Accept,
    Reject,
    Skip,
}

impl FilterResult {
    /// `NodeFilter.FILTER_*` value
    pub fn to_u16(self) -> u16 {
        match self {
            FilterResult::Accept => 1,
            FilterResult::Reject => 2,
            FilterResult::Skip => 3,
        }
    }
}

/// Constants exposed on the global `NodeFilter` interface object
pub const NODE_FILTER_CONSTANTS: &[(&str, u32)] = &[
    ("FILTER_ACCEPT", 1),
    ("FILTER_REJECT", 2),
    ("FILTER_SKIP", 3),
    ("SHOW_ALL", 0xFFFFFFFF),
    ("SHOW_ELEMENT", 0x1),
    ("SHOW_ATTRIBUTE", 0x2),
    ("SHOW_TEXT", 0x4),
    ("SHOW_CDATA_SECTION", 0x8),
    ("SHOW_ENTITY_REFERENCE", 0x10),
    ("SHOW_ENTITY", 0x20),
    ("SHOW_PROCESSING_INSTRUCTION", 0x40),
    ("SHOW_COMMENT", 0x80),
    ("SHOW_DOCUMENT", 0x100),
    ("SHOW_DOCUMENT_TYPE", 0x200),
    ("SHOW_DOCUMENT_FRAGMENT", 0x400),
    ("SHOW_NOTATION", 0x800),
];

/// Node filter trait for custom filtering
pub trait NodeFilter {
    fn accept_node(&self, store: &NodeStore, node: NodeId) -> FilterResult;
}

impl<F> NodeFilter for F
where
    F: Fn(&NodeStore, NodeId) -> FilterResult,
{
    fn accept_node(&self, store: &NodeStore, node: NodeId) -> FilterResult {
        self(store, node)
    }
}

/// Collect the nodes a NodeIterator rooted at `root` would yield
pub fn select_nodes(
    store: &NodeStore,
    root: NodeId,
    what_to_show: WhatToShow,
    filter: Option<&dyn NodeFilter>,
) -> StaticNodeList {
    if !store.contains(root) {
        return StaticNodeList::default();
    }
    let nodes = std::iter::once(root)
        .chain(store.descendants(root))
        .filter(|&id| {
            let shown = store
                .node_type(id)
                .is_some_and(|t| what_to_show.includes(t));
            shown
                && filter.is_none_or(|f| f.accept_node(store, id) == FilterResult::Accept)
        })
        .collect();
    StaticNodeList::retained(store, nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_what_to_show() {
        let show = WhatToShow::ELEMENT.or(WhatToShow::TEXT);
        assert!(show.includes(NodeType::Element));
        assert!(show.includes(NodeType::Text));
        assert!(!show.includes(NodeType::Comment));
        assert!(WhatToShow::default().includes(NodeType::Comment));
    }

    #[test]
    fn test_constants_match_masks() {
        let lookup = |name: &str| {
            NODE_FILTER_CONSTANTS
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| *v)
        };
        assert_eq!(lookup("SHOW_ELEMENT"), Some(WhatToShow::ELEMENT.bits()));
        assert_eq!(lookup("SHOW_COMMENT"), Some(WhatToShow::COMMENT.bits()));
        assert_eq!(lookup("FILTER_SKIP"), Some(u32::from(FilterResult::Skip.to_u16())));
    }

    #[test]
    fn test_select_nodes() {
        let mut store = NodeStore::new();
        let div = store.create_element("div");
        let text = store.create_text("a");
        let comment = store.create_comment("c");
        let span = store.create_element("span");
        let inner = store.create_text("b");
        store.append_child(div, text).unwrap();
        store.append_child(div, comment).unwrap();
        store.append_child(div, span).unwrap();
        store.append_child(span, inner).unwrap();

        let all = select_nodes(&store, div, WhatToShow::ALL, None);
        assert_eq!(all.as_slice(), &[div, text, comment, span, inner]);

        let texts = select_nodes(&store, div, WhatToShow::TEXT, None);
        assert_eq!(texts.as_slice(), &[text, inner]);

        // Rejecting span still visits its children
        let no_span = |s: &NodeStore, id: NodeId| {
            if s.local_name(id) == Some("span") {
                FilterResult::Reject
            } else {
                FilterResult::Accept
            }
        };
        let filtered = select_nodes(&store, div, WhatToShow::ALL, Some(&no_span));
        assert_eq!(filtered.as_slice(), &[div, text, comment, inner]);

        // Snapshot is unaffected by later mutation
        store.remove_child(div, text).unwrap();
        assert_eq!(texts.length(), 2);
    }
}
