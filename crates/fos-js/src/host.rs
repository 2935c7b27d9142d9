//! Host object registry
//!
//! Describes which window globals exist under which engine variant and what
//! they look like to script (`typeof`, `Reflect.has`, constants). The table
//! is assembled once through [`RegistryBuilder`] and is read-only afterwards;
//! windows share it behind an `Arc`.

use crate::variant::{EngineVariant, VariantSet};
use fos_dom::tree_walker::NODE_FILTER_CONSTANTS;

/// What `typeof` reports for an available feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Interface object / constructor
    Constructor,
    Function,
    Object,
    Number,
    String,
}

impl FeatureKind {
    pub fn type_of(self) -> &'static str {
        match self {
            FeatureKind::Constructor | FeatureKind::Function => "function",
            FeatureKind::Object => "object",
            FeatureKind::Number => "number",
            FeatureKind::String => "string",
        }
    }
}

/// Script-visible shape of a host feature
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureShape {
    pub kind: FeatureKind,
    pub members: Vec<String>,
    pub constants: Vec<(String, f64)>,
}

impl FeatureShape {
    /// `member in feature`
    pub fn has_member(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member) || self.constant(member).is_some()
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }
}

/// One named global under a set of engine variants
#[derive(Debug, Clone, PartialEq)]
pub struct HostFeatureDescriptor {
    pub name: String,
    pub availability: VariantSet,
    pub shape: FeatureShape,
}

impl HostFeatureDescriptor {
    pub fn new(name: &str, kind: FeatureKind) -> Self {
        Self {
            name: name.to_string(),
            availability: VariantSet::ALL,
            shape: FeatureShape {
                kind,
                members: Vec::new(),
                constants: Vec::new(),
            },
        }
    }

    pub fn available_in(mut self, variants: VariantSet) -> Self {
        self.availability = variants;
        self
    }

    pub fn members(mut self, members: &[&str]) -> Self {
        self.shape.members.extend(members.iter().map(|m| m.to_string()));
        self
    }

    pub fn constant(mut self, name: &str, value: f64) -> Self {
        self.shape.constants.push((name.to_string(), value));
        self
    }
}

/// Outcome of resolving a global name
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureResult<'a> {
    Available(&'a FeatureShape),
    Unavailable,
}

impl<'a> FeatureResult<'a> {
    pub fn is_available(&self) -> bool {
        matches!(self, FeatureResult::Available(_))
    }

    pub fn shape(&self) -> Option<&'a FeatureShape> {
        match self {
            FeatureResult::Available(shape) => Some(shape),
            FeatureResult::Unavailable => None,
        }
    }
}

/// Immutable table of host features
#[derive(Debug, Clone, Default)]
pub struct HostObjectRegistry {
    descriptors: Vec<HostFeatureDescriptor>,
}

impl HostObjectRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Resolve a global name; the first descriptor covering `variant` wins
    pub fn resolve(&self, name: &str, variant: EngineVariant) -> FeatureResult<'_> {
        self.descriptors
            .iter()
            .find(|d| d.name == name && d.availability.contains(variant))
            .map_or(FeatureResult::Unavailable, |d| FeatureResult::Available(&d.shape))
    }

    /// `typeof window[name]`
    pub fn type_of(&self, name: &str, variant: EngineVariant) -> &'static str {
        self.resolve(name, variant)
            .shape()
            .map_or("undefined", |s| s.kind.type_of())
    }

    /// `Reflect.has(window[name], member)`; false when the global is absent
    pub fn has_member(&self, name: &str, member: &str, variant: EngineVariant) -> bool {
        self.resolve(name, variant)
            .shape()
            .is_some_and(|s| s.has_member(member))
    }

    /// `window[name][member]` for constant tables
    pub fn constant(&self, name: &str, member: &str, variant: EngineVariant) -> Option<f64> {
        self.resolve(name, variant).shape()?.constant(member)
    }

    /// Names available under `variant`, in registration order
    pub fn names(&self, variant: EngineVariant) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for d in &self.descriptors {
            if d.availability.contains(variant) && !names.contains(&d.name.as_str()) {
                names.push(&d.name);
            }
        }
        names
    }

    /// The table every window gets unless configured otherwise
    pub fn standard() -> Self {
        use EngineVariant::InternetExplorer as Ie;

        let modern = VariantSet::all_except(&[Ie]);
        let legacy = VariantSet::only(&[Ie]);

        let node_filter = |kind: FeatureKind, availability: VariantSet| {
            NODE_FILTER_CONSTANTS.iter().fold(
                HostFeatureDescriptor::new("NodeFilter", kind)
                    .available_in(availability)
                    .members(&["acceptNode"]),
                |desc, (name, value)| desc.constant(name, f64::from(*value)),
            )
        };

        let mut builder = Self::builder()
            .register(
                HostFeatureDescriptor::new("FontFace", FeatureKind::Constructor)
                    .available_in(modern)
                    .members(&[
                        "family", "style", "weight", "stretch", "display", "status", "loaded",
                        "load",
                    ]),
            )
            .register(
                HostFeatureDescriptor::new("Reflect", FeatureKind::Object)
                    .available_in(modern)
                    .members(&[
                        "apply",
                        "construct",
                        "defineProperty",
                        "deleteProperty",
                        "get",
                        "getOwnPropertyDescriptor",
                        "getPrototypeOf",
                        "has",
                        "isExtensible",
                        "ownKeys",
                        "preventExtensions",
                        "set",
                        "setPrototypeOf",
                    ]),
            )
            .register(node_filter(FeatureKind::Constructor, modern))
            .register(node_filter(FeatureKind::Object, legacy))
            .register(
                HostFeatureDescriptor::new("applicationCache", FeatureKind::Object)
                    .available_in(legacy)
                    .members(&["status", "update", "abort", "swapCache"])
                    .constant("UNCACHED", 0.0)
                    .constant("IDLE", 1.0)
                    .constant("CHECKING", 2.0)
                    .constant("DOWNLOADING", 3.0)
                    .constant("UPDATEREADY", 4.0)
                    .constant("OBSOLETE", 5.0),
            )
            .register(
                HostFeatureDescriptor::new("NodeList", FeatureKind::Constructor)
                    .available_in(modern)
                    .members(&["length", "item", "forEach", "entries", "keys", "values"]),
            )
            .register(
                HostFeatureDescriptor::new("NodeList", FeatureKind::Object)
                    .available_in(legacy)
                    .members(&["length", "item"]),
            )
            .register(
                HostFeatureDescriptor::new("NamedNodeMap", FeatureKind::Constructor).members(&[
                    "length",
                    "item",
                    "getNamedItem",
                    "setNamedItem",
                    "removeNamedItem",
                ]),
            )
            .register(
                HostFeatureDescriptor::new("console", FeatureKind::Object)
                    .members(&["log", "info", "warn", "error", "debug"]),
            );

        for function in ["setTimeout", "setInterval", "clearTimeout", "clearInterval", "open"] {
            builder = builder.register(HostFeatureDescriptor::new(function, FeatureKind::Function));
        }
        builder.build()
    }
}

/// Assembles a [`HostObjectRegistry`]
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: Vec<HostFeatureDescriptor>,
}

impl RegistryBuilder {
    pub fn register(mut self, descriptor: HostFeatureDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Drop every descriptor for `name`
    pub fn remove(mut self, name: &str) -> Self {
        self.descriptors.retain(|d| d.name != name);
        self
    }

    pub fn build(self) -> HostObjectRegistry {
        tracing::debug!(features = self.descriptors.len(), "host object registry built");
        HostObjectRegistry {
            descriptors: self.descriptors,
        }
    }
}
