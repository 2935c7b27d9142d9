//! DOM Tree (generational arena)
//!
//! The store owns every node of one document. Removing a node only detaches
//! it; slots are reclaimed by [`NodeStore::sweep`] once a detached subtree
//! holds no externally referenced node. External references are explicit
//! pins and the node sets retained by collections handed out to script.
//! Reclaimed slots bump their generation, so stale handles resolve to `None`
//! rather than to whatever reused the slot.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use crate::node::ElementData;
use crate::{DomError, DomResult, Generation, NamedNodeMap, Node, NodeData, NodeId, NodeType};

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena-based DOM tree
#[derive(Debug)]
pub struct NodeStore {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    live: usize,
    generation: Generation,
    /// Node sets held by snapshots and views; dead entries are pruned lazily
    retainers: RefCell<Vec<Weak<[NodeId]>>>,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    /// Create a store holding only the document node
    pub fn new() -> Self {
        let mut store = Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
            generation: Generation::INITIAL,
            retainers: RefCell::new(Vec::new()),
        };
        let root = store.alloc(NodeData::Document);
        debug_assert_eq!(root, NodeId::ROOT);
        store
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of live (not destroyed) nodes, including the document
    pub fn len(&self) -> usize {
        self.live
    }

    /// Always false: the document node cannot be destroyed
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Mutation counter, bumped on every successful change
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::UnknownHandle(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::UnknownHandle(id))
    }

    /// Whether the handle still refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(Node::new(data));
            NodeId { index, generation: slot.generation }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot { generation: 0, node: Some(Node::new(data)) });
            NodeId { index, generation: 0 }
        }
    }

    fn touch(&mut self) {
        self.generation = self.generation.next();
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create a detached HTML element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a detached element outside the HTML namespace
    pub fn create_foreign_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element(ElementData::foreign(tag)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(text.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Comment(text.to_string()))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.alloc(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        })
    }

    /// Create an empty document fragment
    pub fn create_document_fragment(&mut self) -> NodeId {
        self.alloc(NodeData::DocumentFragment)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Ordered children of a node (empty for unknown handles)
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Parent of a node
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Position of a node inside its parent's child list
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent_of(id)?;
        self.children_of(parent).iter().position(|&c| c == id)
    }

    /// Previous sibling, derived from the parent's child sequence
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(id)?;
        let index = self.index_in_parent(id)?;
        index.checked_sub(1).map(|i| self.children_of(parent)[i])
    }

    /// Next sibling, derived from the parent's child sequence
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(id)?;
        let index = self.index_in_parent(id)?;
        self.children_of(parent).get(index + 1).copied()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children_of(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children_of(id).last().copied()
    }

    /// Inclusive ancestor test: true when `ancestor` is `node` or above it
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }

    /// Whether the node is attached (transitively) to the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_inclusive_ancestor(NodeId::ROOT, id)
    }

    /// Pre-order descendants of `root`, excluding `root` itself
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children_of(root).to_vec();
        stack.reverse();
        Descendants { store: self, stack }
    }

    // ------------------------------------------------------------------
    // Node data
    // ------------------------------------------------------------------

    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.get(id).map(Node::node_type)
    }

    /// DOM `nodeName` (`HEAD`, `#text`, ...)
    pub fn node_name(&self, id: NodeId) -> Option<String> {
        self.get(id).map(Node::node_name)
    }

    /// Lower-case local name for elements
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)
            .and_then(Node::as_element)
            .map(|e| e.local_name.as_str())
    }

    /// DOM `textContent`; `None` for the document and doctypes
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        let node = self.get(id)?;
        match &node.data {
            NodeData::Text(t) | NodeData::Comment(t) => Some(t.clone()),
            NodeData::Element(_) | NodeData::DocumentFragment => Some(
                self.descendants(id)
                    .filter_map(|d| self.get(d).and_then(Node::as_text))
                    .collect(),
            ),
            NodeData::Document | NodeData::Doctype { .. } => None,
        }
    }

    /// Replace the data of a text or comment node
    pub fn set_character_data(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        match &mut self.node_mut(id)?.data {
            NodeData::Text(t) | NodeData::Comment(t) => {
                value.clone_into(t);
            }
            _ => return Err(DomError::InvalidNodeType(id)),
        }
        self.touch();
        Ok(())
    }

    /// Attributes of an element
    pub fn attributes_of(&self, id: NodeId) -> Option<&NamedNodeMap> {
        self.get(id).and_then(Node::as_element).map(|e| &e.attrs)
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let elem = self.get(id).and_then(Node::as_element)?;
        if elem.html {
            elem.attrs.get_attribute(&name.to_ascii_lowercase())
        } else {
            elem.attrs.get_attribute(name)
        }
    }

    /// Set an attribute; HTML attribute names are lower-cased
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let elem = self
            .node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType(id))?;
        if elem.html {
            elem.attrs.set_attribute(&name.to_ascii_lowercase(), value);
        } else {
            elem.attrs.set_attribute(name, value);
        }
        self.touch();
        Ok(())
    }

    /// Remove an attribute, returning whether it existed
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<bool> {
        let elem = self
            .node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType(id))?;
        let name = if elem.html { name.to_ascii_lowercase() } else { name.to_string() };
        let removed = elem.attrs.remove_named_item(&name).is_some();
        if removed {
            self.touch();
        }
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Append a child, moving it if it is attached elsewhere
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference`, or at the end when `None`
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        if let Err(err) = self.pre_insert_check(parent, child, reference, None) {
            tracing::debug!(%parent, %child, %err, "rejected insertion");
            return Err(err);
        }

        let reference = if reference == Some(child) {
            self.next_sibling(child)
        } else {
            reference
        };

        let moved = if self.node(child)?.node_type() == NodeType::DocumentFragment {
            std::mem::take(&mut self.node_mut(child)?.children)
        } else {
            self.detach(child);
            vec![child]
        };

        for &id in &moved {
            self.node_mut(id)?.parent = Some(parent);
        }
        let position = match reference {
            Some(r) => self.index_in_parent(r).unwrap_or(self.children_of(parent).len()),
            None => self.children_of(parent).len(),
        };
        self.node_mut(parent)?
            .children
            .splice(position..position, moved);

        self.touch();
        tracing::trace!(%parent, %child, position, "inserted node");
        Ok(child)
    }

    /// Remove a child; its subtree is detached, not destroyed
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.node(parent)?;
        if self.node(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        self.touch();
        tracing::trace!(%parent, %child, "removed node");
        Ok(child)
    }

    /// Replace `old_child` with `new_child`, returning the old child
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> DomResult<NodeId> {
        self.node(parent)?;
        if self.node(old_child)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child: old_child });
        }
        if new_child == old_child {
            return Ok(old_child);
        }
        let reference = self.next_sibling(old_child);
        let reference = if reference == Some(new_child) {
            self.next_sibling(new_child)
        } else {
            reference
        };
        self.pre_insert_check(parent, new_child, None, Some(old_child))?;
        self.detach(old_child);
        self.insert_before(parent, new_child, reference)?;
        Ok(old_child)
    }

    /// Detach a node from its parent, if any
    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent_of(id) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = None;
        }
    }

    /// Validity of inserting `child` under `parent`. `replacing` is the child
    /// that leaves in the same operation and does not count as existing.
    fn pre_insert_check(
        &self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
        replacing: Option<NodeId>,
    ) -> DomResult<()> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;

        if !parent_node.can_have_children() {
            return Err(DomError::InvalidHierarchy("parent cannot have children"));
        }
        if child_node.node_type() == NodeType::Document {
            return Err(DomError::InvalidHierarchy("a document cannot be inserted"));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::InvalidHierarchy("node is an ancestor of the parent"));
        }
        if let Some(r) = reference {
            if self.node(r)?.parent != Some(parent) {
                return Err(DomError::NotAChild { parent, child: r });
            }
        }

        if parent_node.node_type() == NodeType::Document {
            let inserted: Vec<NodeType> = match child_node.node_type() {
                NodeType::DocumentFragment => child_node
                    .children
                    .iter()
                    .filter_map(|&c| self.node_type(c))
                    .collect(),
                other => vec![other],
            };
            if inserted.contains(&NodeType::Text) {
                return Err(DomError::InvalidHierarchy("text cannot be a child of the document"));
            }
            let existing_elements = parent_node
                .children
                .iter()
                .filter(|&&c| c != child && Some(c) != replacing)
                .filter(|&&c| self.get(c).is_some_and(Node::is_element))
                .count();
            let new_elements = inserted.iter().filter(|&&t| t == NodeType::Element).count();
            if existing_elements + new_elements > 1 {
                return Err(DomError::InvalidHierarchy("document can hold one element"));
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lifetime
    // ------------------------------------------------------------------

    /// Record an external reference to a node
    pub fn pin(&mut self, id: NodeId) -> DomResult<()> {
        self.node_mut(id)?.pins += 1;
        Ok(())
    }

    /// Drop an external reference; unpinning an unpinned node is a no-op
    pub fn unpin(&mut self, id: NodeId) -> DomResult<()> {
        let node = self.node_mut(id)?;
        node.pins = node.pins.saturating_sub(1);
        Ok(())
    }

    /// Hold `nodes` on behalf of a collection.
    ///
    /// The nodes survive [`sweep`](Self::sweep) for as long as the returned
    /// handle (or a clone of it) is alive.
    pub fn retain(&self, nodes: Vec<NodeId>) -> Rc<[NodeId]> {
        let held: Rc<[NodeId]> = Rc::from(nodes);
        let mut retainers = self.retainers.borrow_mut();
        retainers.retain(|w| w.strong_count() > 0);
        retainers.push(Rc::downgrade(&held));
        held
    }

    /// Nodes currently held by live collections
    fn retained_nodes(&mut self) -> HashSet<NodeId> {
        let retainers = self.retainers.get_mut();
        retainers.retain(|w| w.strong_count() > 0);
        let mut held = HashSet::new();
        for nodes in retainers.iter().filter_map(Weak::upgrade) {
            held.extend(nodes.iter().copied());
        }
        held
    }

    /// Destroy every detached subtree that holds no pinned or retained node.
    ///
    /// Returns the number of destroyed nodes.
    pub fn sweep(&mut self) -> usize {
        let held = self.retained_nodes();
        let detached_roots: Vec<NodeId> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let node = slot.node.as_ref()?;
                (node.parent.is_none() && index != 0).then_some(NodeId {
                    index: index as u32,
                    generation: slot.generation,
                })
            })
            .collect();

        let mut destroyed = 0;
        for root in detached_roots {
            let mut subtree: Vec<NodeId> = vec![root];
            subtree.extend(self.descendants(root));
            let referenced = subtree.iter().any(|&id| {
                held.contains(&id) || self.get(id).is_some_and(|n| n.pins > 0)
            });
            if referenced {
                continue;
            }
            for id in subtree {
                let slot = &mut self.slots[id.index as usize];
                slot.node = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push(id.index);
                self.live -= 1;
                destroyed += 1;
            }
        }

        if destroyed > 0 {
            tracing::debug!(destroyed, "swept detached nodes");
        }
        destroyed
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    store: &'a NodeStore,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.store.children_of(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (NodeStore, NodeId, NodeId, NodeId) {
        let mut store = NodeStore::new();
        let html = store.create_element("html");
        let head = store.create_element("head");
        let body = store.create_element("body");
        store.append_child(store.root(), html).unwrap();
        store.append_child(html, head).unwrap();
        store.append_child(html, body).unwrap();
        (store, html, head, body)
    }

    #[test]
    fn test_append_and_siblings() {
        let (store, html, head, body) = sample();

        assert_eq!(store.children_of(html), &[head, body]);
        assert_eq!(store.parent_of(body), Some(html));
        assert_eq!(store.next_sibling(head), Some(body));
        assert_eq!(store.previous_sibling(body), Some(head));
        assert_eq!(store.previous_sibling(head), None);
        assert_eq!(store.next_sibling(body), None);
        assert!(store.is_connected(body));
    }

    #[test]
    fn test_append_ancestor_rejected() {
        let (mut store, html, _head, body) = sample();
        let before = store.generation();

        let err = store.append_child(body, html).unwrap_err();
        assert!(matches!(err, DomError::InvalidHierarchy(_)));
        assert_eq!(
            store.append_child(body, body),
            Err(DomError::InvalidHierarchy("node is an ancestor of the parent"))
        );
        assert_eq!(store.parent_of(html), Some(NodeId::ROOT));
        assert_eq!(store.generation(), before);
    }

    #[test]
    fn test_text_cannot_have_children() {
        let mut store = NodeStore::new();
        let text = store.create_text("hi");
        let div = store.create_element("div");
        assert!(matches!(store.append_child(text, div), Err(DomError::InvalidHierarchy(_))));
    }

    #[test]
    fn test_reparent_moves_node() {
        let (mut store, html, head, body) = sample();
        let div = store.create_element("div");
        store.append_child(head, div).unwrap();
        store.append_child(body, div).unwrap();

        assert!(store.children_of(head).is_empty());
        assert_eq!(store.children_of(body), &[div]);
        assert_eq!(store.children_of(html).len(), 2);
    }

    #[test]
    fn test_insert_before_and_self_reference() {
        let (mut store, html, head, body) = sample();
        let meta = store.create_element("meta");
        store.insert_before(html, meta, Some(body)).unwrap();
        assert_eq!(store.children_of(html), &[head, meta, body]);

        // Inserting a node before itself keeps its position
        store.insert_before(html, meta, Some(meta)).unwrap();
        assert_eq!(store.children_of(html), &[head, meta, body]);

        let stray = store.create_element("p");
        let err = store.insert_before(html, meta, Some(stray)).unwrap_err();
        assert_eq!(err, DomError::NotAChild { parent: html, child: stray });
    }

    #[test]
    fn test_remove_child_detaches_subtree() {
        let (mut store, html, _head, body) = sample();
        let p = store.create_element("p");
        let text = store.create_text("x");
        store.append_child(body, p).unwrap();
        store.append_child(p, text).unwrap();

        store.remove_child(html, body).unwrap();
        assert_eq!(store.parent_of(body), None);
        assert_eq!(store.children_of(body), &[p]);
        assert!(!store.is_connected(text));
        assert_eq!(store.text_content(body).as_deref(), Some("x"));

        let err = store.remove_child(html, body).unwrap_err();
        assert_eq!(err, DomError::NotAChild { parent: html, child: body });
    }

    #[test]
    fn test_fragment_moves_children() {
        let (mut store, _html, _head, body) = sample();
        let frag = store.create_document_fragment();
        let a = store.create_element("a");
        let b = store.create_text("b");
        store.append_child(frag, a).unwrap();
        store.append_child(frag, b).unwrap();

        store.append_child(body, frag).unwrap();
        assert_eq!(store.children_of(body), &[a, b]);
        assert!(store.children_of(frag).is_empty());
        assert_eq!(store.parent_of(a), Some(body));
    }

    #[test]
    fn test_document_single_element() {
        let (mut store, _html, _head, _body) = sample();
        let other = store.create_element("html");
        assert!(matches!(
            store.append_child(NodeId::ROOT, other),
            Err(DomError::InvalidHierarchy(_))
        ));
        let text = store.create_text("x");
        assert!(store.append_child(NodeId::ROOT, text).is_err());
        let comment = store.create_comment("ok");
        assert!(store.append_child(NodeId::ROOT, comment).is_ok());
    }

    #[test]
    fn test_replace_child() {
        let (mut store, html, head, body) = sample();
        let main = store.create_element("main");
        let old = store.replace_child(html, main, head).unwrap();
        assert_eq!(old, head);
        assert_eq!(store.children_of(html), &[main, body]);
        assert_eq!(store.parent_of(head), None);
    }

    #[test]
    fn test_replace_document_element() {
        let (mut store, html, _head, _body) = sample();
        let comment = store.create_comment("before");
        store.insert_before(NodeId::ROOT, comment, Some(html)).unwrap();
        let svg = store.create_foreign_element("svg");

        let old = store.replace_child(NodeId::ROOT, svg, html).unwrap();
        assert_eq!(old, html);
        assert_eq!(store.children_of(NodeId::ROOT), &[comment, svg]);
        assert_eq!(store.parent_of(html), None);

        // A second element is still refused
        let extra = store.create_element("html");
        let err = store.replace_child(NodeId::ROOT, extra, comment).unwrap_err();
        assert_eq!(err, DomError::InvalidHierarchy("document can hold one element"));
        assert_eq!(store.children_of(NodeId::ROOT), &[comment, svg]);
    }

    #[test]
    fn test_sweep_keeps_retained_nodes() {
        let (mut store, _html, _head, body) = sample();
        let p = store.create_element("p");
        let text = store.create_text("held");
        store.append_child(body, p).unwrap();
        store.append_child(p, text).unwrap();
        store.remove_child(body, p).unwrap();

        let held = store.retain(vec![p]);
        assert_eq!(store.sweep(), 0);
        assert!(store.contains(p));
        assert_eq!(store.children_of(p), &[text]);

        drop(held);
        assert_eq!(store.sweep(), 2);
        assert!(!store.contains(p));
        assert!(!store.contains(text));
    }

    #[test]
    fn test_sweep_respects_pins() {
        let (mut store, html, _head, body) = sample();
        let kept = store.create_element("div");
        let span = store.create_element("span");
        store.append_child(body, kept).unwrap();
        store.append_child(kept, span).unwrap();
        store.remove_child(body, kept).unwrap();
        store.pin(span).unwrap();

        let lost = store.create_text("gone");
        let before = store.len();
        assert_eq!(store.sweep(), 1);
        assert_eq!(store.len(), before - 1);
        assert!(!store.contains(lost));
        assert!(store.contains(kept));

        store.unpin(span).unwrap();
        assert_eq!(store.sweep(), 2);
        assert_eq!(store.append_child(html, kept), Err(DomError::UnknownHandle(kept)));

        // Reused slot gets a fresh generation
        let fresh = store.create_element("p");
        assert_ne!(fresh, kept);
        assert!(store.get(kept).is_none());
    }

    #[test]
    fn test_attributes_case_insensitive() {
        let (mut store, _html, _head, body) = sample();
        store.set_attribute(body, "onLoad", "init()").unwrap();
        assert_eq!(store.get_attribute(body, "ONLOAD"), Some("init()"));
        assert_eq!(store.attributes_of(body).map(NamedNodeMap::length), Some(1));
        assert!(store.remove_attribute(body, "onload").unwrap());
        assert!(!store.remove_attribute(body, "onload").unwrap());

        let text = store.create_text("t");
        assert_eq!(store.set_attribute(text, "a", "b"), Err(DomError::InvalidNodeType(text)));
    }

    #[test]
    fn test_descendants_preorder() {
        let (mut store, html, head, body) = sample();
        let title = store.create_element("title");
        store.append_child(head, title).unwrap();
        let order: Vec<_> = store.descendants(NodeId::ROOT).collect();
        assert_eq!(order, vec![html, head, title, body]);
    }
}
