//! Selector matching for `querySelectorAll`
//!
//! Selector matching is pluggable through [`SelectorEngine`]; the document
//! only needs an ordered sequence of matching nodes back. The bundled
//! [`SimpleSelectorEngine`] covers the common subset:
//! type/universal, `#id`, `.class`, `[attr]`, `[attr=value]`, descendant and
//! child combinators, and comma-separated lists.

use std::iter::Peekable;
use std::str::Chars;

use crate::node::ElementData;
use crate::{DomError, DomResult, Node, NodeId, NodeStore};

/// Producer of `querySelectorAll` results
pub trait SelectorEngine {
    /// Matching descendants of `root`, in document order, without duplicates
    fn query_all(&self, store: &NodeStore, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>>;
}

/// Default selector engine
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleSelectorEngine;

impl SelectorEngine for SimpleSelectorEngine {
    fn query_all(&self, store: &NodeStore, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        let list = parse_selector_list(selector)?;
        Ok(store
            .descendants(root)
            .filter(|&id| list.iter().any(|complex| complex.matches(store, id)))
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrCondition {
    Exists(String),
    Equals(String, String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
}

impl Compound {
    fn matches(&self, elem: &ElementData) -> bool {
        if let Some(tag) = &self.tag {
            let same = if elem.html {
                elem.local_name.eq_ignore_ascii_case(tag)
            } else {
                elem.local_name == *tag
            };
            if !same {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if elem.id() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| elem.classes().any(|have| have == c.as_str())) {
            return false;
        }
        self.attrs.iter().all(|cond| match cond {
            AttrCondition::Exists(name) => elem.attrs.has_attribute(name),
            AttrCondition::Equals(name, value) => {
                elem.attrs.get_attribute(name) == Some(value.as_str())
            }
        })
    }
}

/// Compounds joined by combinators; `combinators[i]` sits between
/// `parts[i]` and `parts[i + 1]`
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<Compound>,
    combinators: Vec<Combinator>,
}

impl Complex {
    fn matches(&self, store: &NodeStore, id: NodeId) -> bool {
        self.matches_from(store, id, self.parts.len() - 1)
    }

    fn matches_from(&self, store: &NodeStore, id: NodeId, index: usize) -> bool {
        let Some(elem) = store.get(id).and_then(Node::as_element) else {
            return false;
        };
        if !self.parts[index].matches(elem) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => store
                .parent_of(id)
                .is_some_and(|p| self.matches_from(store, p, index - 1)),
            Combinator::Descendant => {
                let mut ancestor = store.parent_of(id);
                while let Some(a) = ancestor {
                    if self.matches_from(store, a, index - 1) {
                        return true;
                    }
                    ancestor = store.parent_of(a);
                }
                false
            }
        }
    }
}

fn parse_selector_list(input: &str) -> DomResult<Vec<Complex>> {
    input
        .split(',')
        .map(|part| parse_complex(part.trim()))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| DomError::InvalidSelector(input.to_string()))
}

fn parse_complex(input: &str) -> Option<Complex> {
    let mut chars = input.chars().peekable();
    let mut parts = Vec::new();
    let mut combinators = Vec::new();

    loop {
        let saw_space = skip_whitespace(&mut chars);
        let Some(&next) = chars.peek() else {
            break;
        };
        if !parts.is_empty() {
            if next == '>' {
                chars.next();
                skip_whitespace(&mut chars);
                combinators.push(Combinator::Child);
            } else if saw_space {
                combinators.push(Combinator::Descendant);
            } else {
                return None;
            }
        }
        parts.push(parse_compound(&mut chars)?);
    }

    if parts.is_empty() || combinators.len() + 1 != parts.len() {
        return None;
    }
    Some(Complex { parts, combinators })
}

fn parse_compound(chars: &mut Peekable<Chars<'_>>) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut consumed = false;

    match chars.peek() {
        Some('*') => {
            chars.next();
            consumed = true;
        }
        Some(c) if is_ident_char(*c) => {
            compound.tag = Some(read_ident(chars)?.to_ascii_lowercase());
            consumed = true;
        }
        _ => {}
    }

    loop {
        match chars.peek() {
            Some('#') => {
                chars.next();
                compound.id = Some(read_ident(chars)?);
            }
            Some('.') => {
                chars.next();
                compound.classes.push(read_ident(chars)?);
            }
            Some('[') => {
                chars.next();
                compound.attrs.push(parse_attribute(chars)?);
            }
            _ => break,
        }
        consumed = true;
    }

    consumed.then_some(compound)
}

fn parse_attribute(chars: &mut Peekable<Chars<'_>>) -> Option<AttrCondition> {
    skip_whitespace(chars);
    let name = read_ident(chars)?.to_ascii_lowercase();
    skip_whitespace(chars);
    let condition = if chars.peek() == Some(&'=') {
        chars.next();
        skip_whitespace(chars);
        let value = match chars.peek() {
            Some(&quote @ ('"' | '\'')) => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next()? {
                        c if c == quote => break,
                        c => value.push(c),
                    }
                }
                value
            }
            _ => read_ident(chars)?,
        };
        skip_whitespace(chars);
        AttrCondition::Equals(name, value)
    } else {
        AttrCondition::Exists(name)
    };
    (chars.next()? == ']').then_some(condition)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    (!ident.is_empty()).then_some(ident)
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) -> bool {
    let mut skipped = false;
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
        skipped = true;
    }
    skipped
}
