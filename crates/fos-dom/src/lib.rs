//! fOS DOM - Document Object Model
//!
//! Arena-backed DOM tree with live and static node collections.
//!
//! Nodes are addressed by generational [`NodeId`] handles, so a handle to a
//! destroyed node is detected instead of silently aliasing a newer node.
//! Collections come in two flavours:
//! - [`LiveNodeList`] / [`NamedNodeMapView`]: selector values that re-derive
//!   their contents from the [`NodeStore`] on every access
//! - [`StaticNodeList`]: an owned snapshot captured once

mod attributes;
mod collections;
mod document;
mod generation;
mod node;
mod operations;
mod snapshot;
mod tree;

pub mod selector;
pub mod tree_walker;

pub use attributes::{Attr, NamedNodeMap};
pub use collections::{parse_index, LiveNodeList, LiveSource, NamedNodeMapView};
pub use document::Document;
pub use generation::Generation;
pub use node::{Node, NodeData, NodeType};
pub use operations::{DomError, DomResult};
pub use selector::{SelectorEngine, SimpleSelectorEngine};
pub use snapshot::StaticNodeList;
pub use tree::NodeStore;
pub use tree_walker::{select_nodes, FilterResult, NodeFilter, WhatToShow};

/// Node identifier (generational index into the store arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// The document node every store is created with
    pub const ROOT: NodeId = NodeId { index: 0, generation: 0 };

    /// Slot index inside the arena
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot this handle was issued for
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}
