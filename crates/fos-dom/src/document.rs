//! Document - High-level document API
//!
//! `documentElement`, `head` and `body` are looked up from the tree on every
//! call instead of being cached, so they follow script mutations.

use crate::{
    DomResult, LiveNodeList, NamedNodeMapView, Node, NodeId, NodeStore, SelectorEngine,
    SimpleSelectorEngine, StaticNodeList,
};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    store: NodeStore,
    url: String,
}

impl Document {
    /// Create a document with the minimal `html/head/body` skeleton
    pub fn new(url: &str) -> Self {
        let mut store = NodeStore::new();
        let html = store.create_element("html");
        let head = store.create_element("head");
        let body = store.create_element("body");
        let built = store
            .append_child(NodeId::ROOT, html)
            .and_then(|_| store.append_child(html, head))
            .and_then(|_| store.append_child(html, body));
        debug_assert!(built.is_ok());

        Self {
            store,
            url: url.to_string(),
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            store: NodeStore::new(),
            url: url.to_string(),
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut NodeStore {
        &mut self.store
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        self.store.root()
    }

    /// `document.documentElement`
    pub fn document_element(&self) -> Option<NodeId> {
        self.first_element_child(self.root(), None)
    }

    /// `document.head`
    pub fn head(&self) -> Option<NodeId> {
        self.first_element_child(self.document_element()?, Some("head"))
    }

    /// `document.body`
    pub fn body(&self) -> Option<NodeId> {
        self.first_element_child(self.document_element()?, Some("body"))
    }

    fn first_element_child(&self, parent: NodeId, name: Option<&str>) -> Option<NodeId> {
        self.store.children_of(parent).iter().copied().find(|&c| {
            self.store.get(c).and_then(Node::as_element).is_some_and(|e| {
                name.is_none_or(|n| e.local_name == n)
            })
        })
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.get_elements_by_tag_name("title")
            .item(&self.store, 0)
            .and_then(|t| self.store.text_content(t))
            .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_default()
    }

    /// Get element by ID (first in tree order)
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.store.descendants(self.root()).find(|&n| {
            self.store
                .get(n)
                .and_then(Node::as_element)
                .is_some_and(|e| e.id() == Some(id))
        })
    }

    /// `node.childNodes`; the node stays alive while the view does
    pub fn child_nodes(&self, node: NodeId) -> LiveNodeList {
        LiveNodeList::child_nodes(node).retained(&self.store)
    }

    /// `element.attributes`; the element stays alive while the view does
    pub fn attributes(&self, element: NodeId) -> NamedNodeMapView {
        NamedNodeMapView::of(element).retained(&self.store)
    }

    /// `document.getElementsByTagName(name)`
    pub fn get_elements_by_tag_name(&self, name: &str) -> LiveNodeList {
        LiveNodeList::elements_by_tag_name(self.root(), name)
    }

    /// `document.querySelectorAll(selector)` with the bundled engine
    pub fn query_selector_all(&self, selector: &str) -> DomResult<StaticNodeList> {
        self.query_selector_all_with(&SimpleSelectorEngine, self.root(), selector)
    }

    /// `root.querySelectorAll(selector)` with a caller-supplied engine
    pub fn query_selector_all_with(
        &self,
        engine: &dyn SelectorEngine,
        root: NodeId,
        selector: &str,
    ) -> DomResult<StaticNodeList> {
        let nodes = engine.query_all(&self.store, root, selector)?;
        Ok(StaticNodeList::retained(&self.store, nodes))
    }

    /// `document.querySelector(selector)`
    pub fn query_selector(&self, selector: &str) -> DomResult<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.item(0))
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.store.create_element(tag)
    }

    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        self.store.create_text(text)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.store.append_child(parent, child)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.store.remove_child(parent, child)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::default();
        let html = doc.document_element().unwrap();
        assert_eq!(doc.store().node_name(html).as_deref(), Some("HTML"));
        assert_eq!(doc.store().parent_of(doc.head().unwrap()), Some(html));
        assert_eq!(doc.store().next_sibling(doc.head().unwrap()), doc.body());
        assert_eq!(doc.url(), "about:blank");
        assert_eq!(doc.title(), "");
    }

    #[test]
    fn test_title_and_lookup() {
        let mut doc = Document::new("test://page");
        let head = doc.head().unwrap();
        let title = doc.create_element("title");
        let text = doc.create_text_node("  Hello \n World ");
        doc.append_child(head, title).unwrap();
        doc.append_child(title, text).unwrap();
        assert_eq!(doc.title(), "Hello World");

        let body = doc.body().unwrap();
        let div = doc.create_element("div");
        doc.append_child(body, div).unwrap();
        doc.store_mut().set_attribute(div, "id", "target").unwrap();
        assert_eq!(doc.get_element_by_id("target"), Some(div));
        assert_eq!(doc.get_element_by_id("nope"), None);
    }

    #[test]
    fn test_body_follows_mutation() {
        let mut doc = Document::default();
        let html = doc.document_element().unwrap();
        let body = doc.body().unwrap();
        doc.remove_child(html, body).unwrap();
        assert_eq!(doc.body(), None);
    }

    #[test]
    fn test_query_snapshot_vs_live() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let first = doc.create_element("p");
        doc.append_child(body, first).unwrap();

        let snapshot = doc.query_selector_all("p").unwrap();
        let live = doc.get_elements_by_tag_name("p");

        let second = doc.create_element("p");
        doc.append_child(body, second).unwrap();

        assert_eq!(snapshot.length(), 1);
        assert_eq!(snapshot.get("0"), Some(first));
        assert_eq!(live.length(doc.store()), 2);
        assert_eq!(doc.query_selector("p").unwrap(), Some(first));
    }
}
