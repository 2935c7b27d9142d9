//! HTML5 Parser implementation
//!
//! Uses html5ever's built-in RcDom and converts it to our DOM format.
//! Whitespace-only text nodes are kept: they are real children as far as
//! `childNodes` is concerned.

use fos_dom::{Document, NodeId, NodeStore};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// HTML5 parser
#[derive(Debug, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut document = Document::empty(url);
        let store = document.store_mut();
        for child in dom.document.children.borrow().iter() {
            convert_node(child, store, NodeId::ROOT);
        }

        tracing::debug!("Parsed {} nodes", document.store().len());
        Ok(document)
    }
}

/// Convert an RcDom node (and its subtree) under `parent`
fn convert_node(handle: &Handle, store: &mut NodeStore, parent: NodeId) {
    let id = match &handle.data {
        RcNodeData::Document => {
            for child in handle.children.borrow().iter() {
                convert_node(child, store, parent);
            }
            return;
        }
        RcNodeData::Doctype { name, public_id, system_id } => {
            store.create_doctype(name, public_id, system_id)
        }
        RcNodeData::Text { contents } => store.create_text(&contents.borrow()),
        RcNodeData::Comment { contents } => store.create_comment(contents),
        RcNodeData::Element { name, attrs, .. } => {
            let id = if &*name.ns == HTML_NAMESPACE {
                store.create_element(&name.local)
            } else {
                store.create_foreign_element(&name.local)
            };
            for attr in attrs.borrow().iter() {
                if let Err(err) = store.set_attribute(id, &attr.name.local, &attr.value) {
                    tracing::warn!(%err, "dropping attribute");
                }
            }
            id
        }
        RcNodeData::ProcessingInstruction { .. } => {
            // Not produced for text/html input
            return;
        }
    };

    if let Err(err) = store.append_child(parent, id) {
        tracing::warn!(%parent, %err, "parser produced an invalid insertion");
        return;
    }

    for child in handle.children.borrow().iter() {
        convert_node(child, store, id);
    }

    // Template content is parsed into a separate fragment; flatten it
    // under the template element
    if let RcNodeData::Element { template_contents, .. } = &handle.data {
        if let Some(content) = template_contents.borrow().as_ref() {
            for child in content.children.borrow().iter() {
                convert_node(child, store, id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        assert_eq!(doc.title(), "Test");
        assert!(doc.store().len() > 1, "Expected more than 1 node, got {}", doc.store().len());
    }

    #[test]
    fn test_parse_fragment() {
        let html = "<div><span>Text</span></div>";
        let doc = HtmlParser::new().parse(html).unwrap();

        // Even fragments get wrapped in html/head/body by html5ever
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
    }
}
