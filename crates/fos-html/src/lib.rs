//! fOS HTML Parser
//!
//! HTML5 parsing built on html5ever. The parser produces a
//! [`fos_dom::Document`]; tree-construction quirks (implied `head`,
//! whitespace placement) come straight from html5ever's tree builder.

mod parser;

pub use fos_dom::Document;
pub use parser::HtmlParser;

/// Parse an HTML string into a document at `about:blank`
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),
}
