//! Live node collections
//!
//! `childNodes`, `children`, `getElementsByTagName` and `attributes` are live
//! in the DOM: a list obtained before a mutation reports the mutation when
//! read afterwards. The views here hold nothing but the selector that
//! describes them and re-derive every answer from the store passed in, so
//! they cannot go stale.

use std::rc::Rc;

use crate::{Attr, Node, NodeId, NodeStore};

/// Hold on a view's root node, keeping it alive across `sweep`.
///
/// Views compare equal regardless of their anchor.
#[derive(Debug, Clone, Default)]
struct Anchor(Option<Rc<[NodeId]>>);

impl Anchor {
    fn hold(store: &NodeStore, node: NodeId) -> Self {
        Anchor(Some(store.retain(vec![node])))
    }
}

impl PartialEq for Anchor {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Anchor {}

/// Parse a canonical array-index property key (`"0"`, `"17"`).
///
/// Keys like `"01"`, `"-0"`, `"1.0"` or `" 1"` are ordinary property names,
/// not indices, exactly as for JavaScript array-likes.
pub fn parse_index(key: &str) -> Option<usize> {
    let bytes = key.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    // Array indices stop at 2^32 - 2
    let value: u64 = key.parse().ok()?;
    (value < u64::from(u32::MAX)).then_some(value as usize)
}

/// What a live list selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveSource {
    /// Every child node, text and comments included
    ChildNodes(NodeId),
    /// Element children only
    Children(NodeId),
    /// Descendant elements in tree order; `*` matches all
    ElementsByTagName { root: NodeId, name: String },
}

impl LiveSource {
    /// Node the selection is computed from
    pub fn root(&self) -> NodeId {
        match self {
            LiveSource::ChildNodes(node) | LiveSource::Children(node) => *node,
            LiveSource::ElementsByTagName { root, .. } => *root,
        }
    }
}

/// Live NodeList / HTMLCollection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveNodeList {
    source: LiveSource,
    anchor: Anchor,
}

impl LiveNodeList {
    pub fn new(source: LiveSource) -> Self {
        Self {
            source,
            anchor: Anchor::default(),
        }
    }

    /// Keep the root node alive across `sweep` for as long as this view
    /// (or a clone of it) lives
    pub fn retained(mut self, store: &NodeStore) -> Self {
        self.anchor = Anchor::hold(store, self.source.root());
        self
    }

    /// `node.childNodes`
    pub fn child_nodes(parent: NodeId) -> Self {
        Self::new(LiveSource::ChildNodes(parent))
    }

    /// `element.children`
    pub fn children(parent: NodeId) -> Self {
        Self::new(LiveSource::Children(parent))
    }

    /// `root.getElementsByTagName(name)`
    pub fn elements_by_tag_name(root: NodeId, name: &str) -> Self {
        Self::new(LiveSource::ElementsByTagName {
            root,
            name: name.to_string(),
        })
    }

    pub fn source(&self) -> &LiveSource {
        &self.source
    }

    /// Current members, recomputed from the store
    pub fn iter<'a>(&'a self, store: &'a NodeStore) -> Box<dyn Iterator<Item = NodeId> + 'a> {
        match &self.source {
            LiveSource::ChildNodes(parent) => Box::new(store.children_of(*parent).iter().copied()),
            LiveSource::Children(parent) => Box::new(
                store
                    .children_of(*parent)
                    .iter()
                    .copied()
                    .filter(move |&c| store.get(c).is_some_and(Node::is_element)),
            ),
            LiveSource::ElementsByTagName { root, name } => Box::new(
                store
                    .descendants(*root)
                    .filter(move |&d| tag_matches(store, d, name)),
            ),
        }
    }

    /// Current length
    pub fn length(&self, store: &NodeStore) -> usize {
        match &self.source {
            LiveSource::ChildNodes(parent) => store.children_of(*parent).len(),
            _ => self.iter(store).count(),
        }
    }

    /// Node at `index`, if in range right now
    pub fn item(&self, store: &NodeStore, index: usize) -> Option<NodeId> {
        match &self.source {
            LiveSource::ChildNodes(parent) => store.children_of(*parent).get(index).copied(),
            _ => self.iter(store).nth(index),
        }
    }

    /// `index in list`
    pub fn has(&self, store: &NodeStore, index: usize) -> bool {
        index < self.length(store)
    }

    /// `list[key]` for a property key; numeric strings index the list
    pub fn get(&self, store: &NodeStore, key: &str) -> Option<NodeId> {
        parse_index(key).and_then(|i| self.item(store, i))
    }

    /// `key in list`
    pub fn has_property(&self, store: &NodeStore, key: &str) -> bool {
        match parse_index(key) {
            Some(i) => self.has(store, i),
            None => matches!(key, "length" | "item" | "forEach"),
        }
    }

    pub fn to_vec(&self, store: &NodeStore) -> Vec<NodeId> {
        self.iter(store).collect()
    }
}

fn tag_matches(store: &NodeStore, id: NodeId, name: &str) -> bool {
    let Some(elem) = store.get(id).and_then(Node::as_element) else {
        return false;
    };
    if name == "*" {
        return true;
    }
    if elem.html {
        elem.local_name.eq_ignore_ascii_case(name)
    } else {
        elem.local_name == name
    }
}

/// Live view over an element's attributes (`element.attributes`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedNodeMapView {
    element: NodeId,
    anchor: Anchor,
}

impl NamedNodeMapView {
    pub fn of(element: NodeId) -> Self {
        Self {
            element,
            anchor: Anchor::default(),
        }
    }

    /// Keep the element alive across `sweep` while this view lives
    pub fn retained(mut self, store: &NodeStore) -> Self {
        self.anchor = Anchor::hold(store, self.element);
        self
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Current attribute count (0 when the element is gone)
    pub fn length(&self, store: &NodeStore) -> usize {
        store.attributes_of(self.element).map_or(0, |a| a.length())
    }

    pub fn item<'s>(&self, store: &'s NodeStore, index: usize) -> Option<&'s Attr> {
        store.attributes_of(self.element)?.item(index)
    }

    pub fn has(&self, store: &NodeStore, index: usize) -> bool {
        index < self.length(store)
    }

    /// `getNamedItem`, case-insensitive for HTML elements
    pub fn get_named_item<'s>(&self, store: &'s NodeStore, name: &str) -> Option<&'s Attr> {
        let elem = store.get(self.element)?.as_element()?;
        if elem.html {
            elem.attrs.get_named_item(&name.to_ascii_lowercase())
        } else {
            elem.attrs.get_named_item(name)
        }
    }

    /// `map[key]`: indices first, then attribute names
    pub fn get<'s>(&self, store: &'s NodeStore, key: &str) -> Option<&'s Attr> {
        match parse_index(key) {
            Some(i) => self.item(store, i),
            None => self.get_named_item(store, key),
        }
    }

    /// `key in map`
    pub fn has_property(&self, store: &NodeStore, key: &str) -> bool {
        match parse_index(key) {
            Some(i) => self.has(store, i),
            None => {
                matches!(key, "length" | "item" | "getNamedItem")
                    || self.get_named_item(store, key).is_some()
            }
        }
    }
}
