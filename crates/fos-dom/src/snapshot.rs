//! Static NodeList
//!
//! Query results are captured once. Later mutations never change the list;
//! its handles may point at nodes that were since detached (still readable)
//! or destroyed (the store answers `None` for them).
//!
//! Lists built through [`StaticNodeList::retained`] hold their nodes in the
//! store: [`NodeStore::sweep`] keeps them alive until the last clone of the
//! list is dropped.

use std::rc::Rc;

use crate::{parse_index, LiveNodeList, NodeId, NodeStore};

/// Immutable, point-in-time node sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticNodeList {
    nodes: Rc<[NodeId]>,
}

impl StaticNodeList {
    /// Unretained list; its nodes may be swept while it lives
    pub fn new(nodes: Vec<NodeId>) -> Self {
        Self {
            nodes: Rc::from(nodes),
        }
    }

    /// List whose nodes survive `sweep` while it lives
    pub fn retained(store: &NodeStore, nodes: Vec<NodeId>) -> Self {
        Self {
            nodes: store.retain(nodes),
        }
    }

    /// Freeze the current contents of a live list
    pub fn capture(live: &LiveNodeList, store: &NodeStore) -> Self {
        Self::retained(store, live.to_vec(store))
    }

    pub fn length(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn has(&self, index: usize) -> bool {
        index < self.nodes.len()
    }

    /// `list[key]`; numeric strings index the list
    pub fn get(&self, key: &str) -> Option<NodeId> {
        parse_index(key).and_then(|i| self.item(i))
    }

    /// `key in list`
    pub fn has_property(&self, key: &str) -> bool {
        match parse_index(key) {
            Some(i) => self.has(i),
            None => matches!(key, "length" | "item" | "forEach"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }
}

impl IntoIterator for StaticNodeList {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.to_vec().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_is_frozen() {
        let mut store = NodeStore::new();
        let div = store.create_element("div");
        let a = store.create_element("a");
        store.append_child(div, a).unwrap();

        let live = LiveNodeList::child_nodes(div);
        let frozen = StaticNodeList::capture(&live, &store);

        let b = store.create_element("b");
        store.append_child(div, b).unwrap();
        store.remove_child(div, a).unwrap();

        assert_eq!(live.length(&store), 1);
        assert_eq!(frozen.length(), 1);
        assert_eq!(frozen.item(0), Some(a));
        assert_eq!(frozen.get("0"), frozen.item(0));
        assert!(frozen.has_property("0"));
        assert!(!frozen.has_property("1"));
        // Detached but still a readable node
        assert_eq!(store.node_name(a).as_deref(), Some("A"));
    }

    #[test]
    fn test_capture_survives_sweep_until_dropped() {
        let mut store = NodeStore::new();
        let div = store.create_element("div");
        let a = store.create_element("a");
        store.append_child(div, a).unwrap();

        let frozen = StaticNodeList::capture(&LiveNodeList::child_nodes(div), &store);
        let copy = frozen.clone();
        store.remove_child(div, a).unwrap();
        drop(frozen);

        // div is unreferenced, a is still held by the copy
        assert_eq!(store.sweep(), 1);
        assert!(!store.contains(div));
        assert_eq!(store.node_name(a).as_deref(), Some("A"));

        drop(copy);
        assert_eq!(store.sweep(), 1);
        assert!(!store.contains(a));
    }
}
