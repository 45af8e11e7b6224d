use std::collections::HashMap;

use crate::qname::QName;

/// Flags carried by an `Element`-kind [`Type`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementFlags {
    /// Descendants are opaque text (`xs:any processContents="skip"/"lax"`).
    pub skip_process_contents: bool,
    /// Unknown attributes are tolerated and forwarded to a collector.
    pub any_attribute: bool,
    /// Character data is captured (`mixed="true"` or a textual base).
    pub read_text: bool,
}

/// `(name, type, is_mandatory, default_value)`, §3.3.
#[derive(Debug, Clone)]
pub struct AttributeDescriptor {
    pub name: QName,
    pub type_name: QName,
    pub is_mandatory: bool,
    pub default_value: Option<String>,
}

/// `(name, type, min_occurs, max_occurs, ref_name)`, §3.4.
///
/// `max_occurs == 0` denotes "unbounded" (mirrors
/// `original_source/src/Reader.hpp`'s `Xsd::ElementRef`, where `0` plays
/// the same role instead of a sentinel like `u32::MAX`).
#[derive(Debug, Clone)]
pub struct ElementRef {
    pub name: QName,
    pub type_name: QName,
    pub min_occurs: u32,
    pub max_occurs: u32,
    /// Set while a `ref="…"` use site is still waiting on the
    /// substitution-group post-pass (§4.2.6) to decide whether it points
    /// at a group head or a plain element.
    pub ref_name: Option<QName>,
}

impl ElementRef {
    pub fn is_unbounded(&self) -> bool {
        self.max_occurs == 0
    }
}

/// The discriminant of a [`Type`], §3.2.
#[derive(Debug, Clone)]
pub enum Kind {
    /// Built-in numeric/boolean scalar (`int32`, `double`, `boolean`, …).
    Base { base_name: String },
    /// Built-in textual scalar.
    String,
    /// Alias for another simple type (`xs:restriction` with a non-string,
    /// non-enumerated base).
    SimpleRef { base_type: QName },
    /// String with a closed, ordered value set. Duplicates are preserved.
    Enum { enum_values: Vec<String> },
    /// One-of several simple types.
    Union { member_types: Vec<QName> },
    /// Whitespace-separated sequence of a single item type.
    List { item_type: QName },
    /// Complex type: attributes + child elements, optionally with a base.
    Element {
        base_type: Option<QName>,
        attributes: Vec<AttributeDescriptor>,
        elements: Vec<ElementRef>,
        flags: ElementFlags,
    },
    /// Tagged union of element alternatives reachable via a substitution
    /// group head. Members all carry `min_occurs == 0`.
    SubstitutionGroup { elements: Vec<ElementRef> },
}

#[derive(Debug, Clone)]
pub struct Type {
    pub name: QName,
    pub kind: Kind,
}

impl Type {
    pub fn new(name: QName, kind: Kind) -> Self {
        Self { name, kind }
    }

    pub fn is_element_like(&self) -> bool {
        matches!(self.kind, Kind::Element { .. } | Kind::SubstitutionGroup { .. })
    }
}

/// The flattened Type Graph produced by the resolver (§3.2).
///
/// Built monotonically (types are added, never removed) and frozen once
/// handed to the emitter — matches the lifecycle in §3.6.
#[derive(Debug, Default)]
pub struct TypeGraph {
    types: HashMap<QName, Type>,
    pub root_type: Option<QName>,
    /// First prefix ever seen for a namespace across the loaded forest
    /// (§4.1's loader output), carried through so the emitter can name
    /// namespace constants after the schema author's own prefixes rather
    /// than synthesizing `ns0`/`ns1`-style names.
    pub namespace_to_suggested_prefix: HashMap<String, String>,
}

pub const ROOT_TYPE_LOCAL_NAME: &str = "_root_t";

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &QName) -> bool {
        self.types.contains_key(name)
    }

    pub fn get(&self, name: &QName) -> Option<&Type> {
        self.types.get(name)
    }

    pub fn get_mut(&mut self, name: &QName) -> Option<&mut Type> {
        self.types.get_mut(name)
    }

    /// Inserts a type, overwriting any previous entry of the same name.
    /// Callers are expected to have already checked `contains` where
    /// idempotence matters (§4.2.3); the substitution-group aggregate is
    /// the one case that's deliberately upserted in place.
    pub fn insert(&mut self, ty: Type) {
        self.types.insert(ty.name.clone(), ty);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Type> {
        self.types.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Type> {
        self.types.values_mut()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Invariant check, §3.5: every referenced type name is a key.
    /// Returns the first dangling reference found, if any.
    pub fn find_dangling_reference(&self) -> Option<QName> {
        for ty in self.types.values() {
            for name in referenced_names(ty) {
                if !self.types.contains_key(name) {
                    return Some(name.clone());
                }
            }
        }
        None
    }
}

fn referenced_names(ty: &Type) -> Vec<&QName> {
    match &ty.kind {
        Kind::Base { .. } | Kind::String => Vec::new(),
        Kind::SimpleRef { base_type } => vec![base_type],
        Kind::Enum { .. } => Vec::new(),
        Kind::Union { member_types } => member_types.iter().collect(),
        Kind::List { item_type } => vec![item_type],
        Kind::Element {
            base_type,
            attributes,
            elements,
            ..
        } => {
            let mut names: Vec<&QName> = base_type.iter().collect();
            names.extend(attributes.iter().map(|a| &a.type_name));
            names.extend(elements.iter().map(|e| &e.type_name));
            names
        }
        Kind::SubstitutionGroup { elements } => elements.iter().map(|e| &e.type_name).collect(),
    }
}
