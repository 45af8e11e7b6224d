//! Exercises [`xsd_runtime::parse`] against a literal §8 document with a
//! hand-built descriptor table, the way a generated binding's own table
//! would be wired up. `xsd-generator`'s own tests stop at `syn::parse_file`
//! (syntax only), so nothing previously drove a document through the
//! streaming parser end to end; this is the teacher's own `test-runner`
//! style (hand-written tables, parse real XML) applied to this crate.

use std::any::Any;

use xsd_runtime::{AttributeInfo, ChildElementInfo, ElementInfo, ElementInfoFlags, Position};

#[derive(Debug, Default)]
struct Main1 {
    required: String,
    optional_with_default: String,
    optional_without_default: Option<String>,
}

#[derive(Debug, Default)]
struct RootDoc {
    main1: Option<Main1>,
}

fn set_required(element: &mut dyn Any, _position: Position, value: String) -> xsd_runtime::Result<()> {
    element.downcast_mut::<Main1>().expect("type mismatch").required = value;
    Ok(())
}

fn set_optional_with_default(element: &mut dyn Any, _position: Position, value: String) -> xsd_runtime::Result<()> {
    element.downcast_mut::<Main1>().expect("type mismatch").optional_with_default = value;
    Ok(())
}

fn set_optional_without_default(element: &mut dyn Any, _position: Position, value: String) -> xsd_runtime::Result<()> {
    element.downcast_mut::<Main1>().expect("type mismatch").optional_without_default = Some(value);
    Ok(())
}

fn default_optional_with_default(element: &mut dyn Any) {
    element.downcast_mut::<Main1>().expect("type mismatch").optional_with_default = "No".to_string();
}

static MAIN1_ATTRIBUTES: &[AttributeInfo] = &[
    AttributeInfo { name: "required", set_attribute: set_required, is_mandatory: true, set_default_value: None },
    AttributeInfo {
        name: "optional_with_default",
        set_attribute: set_optional_with_default,
        is_mandatory: false,
        set_default_value: Some(default_optional_with_default),
    },
    AttributeInfo {
        name: "optional_without_default",
        set_attribute: set_optional_without_default,
        is_mandatory: false,
        set_default_value: None,
    },
];

// Main1 is the document root candidate (a direct child of the synthetic
// root wrapper below), so `level1` lives here, not on the wrapper —
// `parse()` descends into this state before its first `set_attribute`
// call ever runs.
static MAIN1_INFO: ElementInfo = ElementInfo {
    flags: ElementInfoFlags { level1: true, read_text: false, skip_processing: false, any_attribute: false },
    children: &[],
    mandatory_children_count: 0,
    attributes: MAIN1_ATTRIBUTES,
    text_field: None,
    any_attribute_sink: None,
    base: None,
};

fn get_main1(parent: &mut dyn Any) -> &mut dyn Any {
    let root = parent.downcast_mut::<RootDoc>().expect("type mismatch");
    root.main1.get_or_insert_with(Default::default) as &mut dyn Any
}

static ROOT_CHILDREN: &[ChildElementInfo] =
    &[ChildElementInfo { name: "Main1", get_field: get_main1, info: &MAIN1_INFO, min_occurs: 0, max_occurs: 1 }];

static ROOT_INFO: ElementInfo = ElementInfo {
    flags: ElementInfoFlags { level1: false, read_text: false, skip_processing: false, any_attribute: false },
    children: ROOT_CHILDREN,
    mandatory_children_count: 0,
    attributes: &[],
    text_field: None,
    any_attribute_sink: None,
    base: None,
};

const NAMESPACES: &[&str] = &["urn:test:attrs"];

#[test]
fn attributes_with_defaults_scenario_parses_and_applies_default() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Main1 xmlns="urn:test:attrs" required="abc" optional_without_default="xyz"/>"#;

    let mut root = RootDoc::default();
    xsd_runtime::parse(xml, NAMESPACES, &mut root, &ROOT_INFO).expect("parse should succeed");

    let main1 = root.main1.expect("Main1 should have been parsed");
    assert_eq!(main1.required, "abc");
    assert_eq!(main1.optional_with_default, "No", "unset default-bearing attribute should take its declared default");
    assert_eq!(main1.optional_without_default, Some("xyz".to_string()));
}

#[test]
fn namespace_prefix_declared_on_document_root_rebinds_cleanly() {
    // Regression test: `level1` used to live on the synthetic root
    // wrapper's own `ElementInfo`, but `parse()` never calls
    // `set_attribute` against that state — it descends straight into the
    // real document root (`Main1` here) before processing any attribute.
    // A `level1`-gated `xmlns:csa` on the wrapper was therefore always
    // dead, and any document whose root used a namespace prefix failed
    // with "Unexpected attribute 'xmlns:csa'".
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<csa:Main1 xmlns:csa="urn:test:attrs" required="abc"/>"#;

    let mut root = RootDoc::default();
    xsd_runtime::parse(xml, NAMESPACES, &mut root, &ROOT_INFO).expect("namespace-prefixed root should parse cleanly");

    let main1 = root.main1.expect("Main1 should have been parsed");
    assert_eq!(main1.required, "abc");
    assert_eq!(main1.optional_with_default, "No");
}

#[test]
fn missing_mandatory_attribute_is_rejected() {
    let xml = r#"<Main1 xmlns="urn:test:attrs" optional_without_default="xyz"/>"#;
    let mut root = RootDoc::default();
    let err = xsd_runtime::parse(xml, NAMESPACES, &mut root, &ROOT_INFO).unwrap_err();
    assert!(err.to_string().contains("Missing attribute 'required'"));
}
