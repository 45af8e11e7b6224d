use lazy_static::lazy_static;
use std::collections::HashSet;

use crate::qname::{QName, XML_NAMESPACE, XSD_NAMESPACE};

/// Built-in XSD numeric/boolean local names that become `Kind::Base`
/// (§4.2.3). Grounded on `original_source/src/Reader.cpp`'s
/// `isXsNumericBaseType`, and on the teacher's `lazy_static!`-table
/// idiom for builtin registration (`dt-xsd::builtins`,
/// `src/xsd/builtins.rs`).
const NUMERIC_BASE_NAMES: &[&str] = &[
    "int",
    "long",
    "short",
    "unsignedInt",
    "unsignedLong",
    "unsignedShort",
    "nonNegativeInteger",
    "positiveInteger",
    "integer",
    "decimal",
    "float",
    "double",
    "boolean",
];

lazy_static! {
    static ref NUMERIC_BASE_SET: HashSet<&'static str> = NUMERIC_BASE_NAMES.iter().copied().collect();
}

/// `true` for any other type in the XSD namespace, plus `xml:lang`
/// (§4.2.3's "otherwise → String" rule).
pub fn is_xsd_string_base_type(name: &QName) -> bool {
    if name.namespace == XSD_NAMESPACE {
        !is_xsd_numeric_base_type(name)
    } else if name.namespace == XML_NAMESPACE {
        name.local_name == "lang"
    } else {
        false
    }
}

pub fn is_xsd_numeric_base_type(name: &QName) -> bool {
    name.namespace == XSD_NAMESPACE && NUMERIC_BASE_SET.contains(name.local_name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numerics_are_not_strings() {
        let int_ = QName::new(XSD_NAMESPACE, "int");
        assert!(is_xsd_numeric_base_type(&int_));
        assert!(!is_xsd_string_base_type(&int_));
    }

    #[test]
    fn other_xsd_names_are_strings() {
        let token = QName::new(XSD_NAMESPACE, "token");
        assert!(is_xsd_string_base_type(&token));
        assert!(!is_xsd_numeric_base_type(&token));
    }

    #[test]
    fn xml_lang_is_string() {
        let lang = QName::new(XML_NAMESPACE, "lang");
        assert!(is_xsd_string_base_type(&lang));
    }

    #[test]
    fn unrelated_namespace_is_neither() {
        let custom = QName::new("urn:example", "Widget");
        assert!(!is_xsd_string_base_type(&custom));
        assert!(!is_xsd_numeric_base_type(&custom));
    }
}
