use std::fmt;

/// A `(namespace, local name)` pair, the primary key for every type,
/// attribute, and element in the Type Graph.
///
/// The empty namespace is distinct from any non-empty one, so an
/// unqualified local type and a type of the same name qualified with
/// `targetNamespace=""` would still collide — XSD itself treats the
/// absent and empty-string target namespace identically, which this
/// type preserves by just using `String::new()` for "no namespace".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    pub namespace: String,
    pub local_name: String,
}

impl QName {
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_name: local_name.into(),
        }
    }

    pub fn local(local_name: impl Into<String>) -> Self {
        Self::new(String::new(), local_name)
    }

    pub fn is_xsd(&self) -> bool {
        self.namespace == XSD_NAMESPACE
    }

    pub fn is_xml(&self) -> bool {
        self.namespace == XML_NAMESPACE
    }

    /// Appends a suffix to the local name, keeping the namespace. Used to
    /// synthesise derived names (`_group_t`, `_item_t`, `_t`).
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self::new(self.namespace.clone(), format!("{}{}", self.local_name, suffix))
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local_name)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local_name)
        }
    }
}

pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
