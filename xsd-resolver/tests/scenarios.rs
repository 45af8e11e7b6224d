//! End-to-end Schema Resolver tests, one per spec scenario in §8. Each
//! fixture under `tests/fixtures/` is resolved into a full [`TypeGraph`]
//! and checked at that level — the generated-code layer is exercised
//! separately in `xsd-compiler`'s own integration tests.

use xsd_resolver::{Kind, QName};

fn fixture(name: &str) -> String {
    format!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/{}"), name)
}

fn resolve(fixture_name: &str) -> xsd_resolver::TypeGraph {
    xsd_resolver::resolve(&fixture(fixture_name), &[], false).expect("resolution should succeed")
}

fn element_kind(graph: &xsd_resolver::TypeGraph, ns: &str, local: &str) -> Kind {
    graph
        .get(&QName::new(ns, local))
        .unwrap_or_else(|| panic!("missing type {ns}#{local}"))
        .kind
        .clone()
}

#[test]
fn attributes_with_defaults() {
    let graph = resolve("attributes_with_defaults.xsd");
    // Main1's complexType is anonymous; §4.2.5's synthetic-name rule gives
    // it `<parent>_<name>_t` with an empty parent local name at the root.
    let Kind::Element { attributes, .. } = element_kind(&graph, "urn:test:attrs", "_Main1_t") else {
        panic!("expected Main1's complex type to resolve to an Element kind");
    };

    let find = |local: &str| attributes.iter().find(|a| a.name.local_name == local).unwrap();

    let required = find("required");
    assert!(required.is_mandatory);
    assert!(required.default_value.is_none());

    let with_default = find("optional_with_default");
    assert!(!with_default.is_mandatory);
    assert_eq!(with_default.default_value.as_deref(), Some("No"));

    let without_default = find("optional_without_default");
    assert!(!without_default.is_mandatory);
    assert!(without_default.default_value.is_none());

    let list_attr = find("optional_without_default_list");
    assert!(!list_attr.is_mandatory);
    let list_type = graph.get(&list_attr.type_name).expect("list attribute type missing");
    assert!(matches!(list_type.kind, Kind::List { .. }));
}

#[test]
fn substitution_group_members_carry_min_occurs_zero() {
    let graph = resolve("substitution_group.xsd");
    let group_name = QName::new("urn:test:subgroup", "Property_group_t");
    let group = graph.get(&group_name).expect("Property_group_t missing");
    let Kind::SubstitutionGroup { elements } = &group.kind else {
        panic!("Property_group_t should be a SubstitutionGroup");
    };
    assert_eq!(elements.len(), 2);
    let names: Vec<&str> = elements.iter().map(|e| e.name.local_name.as_str()).collect();
    assert!(names.contains(&"BooleanProperty"));
    assert!(names.contains(&"FloatingPointProperty"));
    assert!(elements.iter().all(|e| e.min_occurs == 0));

    // The `Main` element's `ref="Property"` use site resolves to the group
    // aggregate type, not to the (abstract) head element's own type, and
    // keeps the use site's own occurs bounds (§4.2.6).
    let main = graph.get(&QName::new("urn:test:subgroup", "_Main_t")).or_else(|| {
        // synthetic name may differ; fall back to scanning for the Element
        // whose single child references the group type.
        graph.iter().find(|ty| {
            matches!(&ty.kind, Kind::Element { elements, .. }
                if elements.iter().any(|e| e.type_name == group_name))
        })
    });
    let main = main.expect("Main's complex type not found");
    let Kind::Element { elements, .. } = &main.kind else {
        panic!("Main should resolve to an Element kind");
    };
    let property_ref = elements.iter().find(|e| e.type_name == group_name).expect("Property ref not resolved to group");
    assert_eq!(property_ref.min_occurs, 0);
    assert!(property_ref.is_unbounded());
}

#[test]
fn choice_under_sequence_flattens_to_mutually_optional_siblings() {
    let graph = resolve("choice_under_sequence.xsd");
    let main = graph
        .iter()
        .find(|ty| matches!(&ty.kind, Kind::Element { elements, .. } if elements.iter().any(|e| e.name.local_name == "ChoiceA")))
        .expect("Main's complex type not found");
    let Kind::Element { elements, .. } = &main.kind else {
        panic!("Main should resolve to an Element kind");
    };
    assert_eq!(elements.len(), 2);
    for name in ["ChoiceA", "ChoiceB"] {
        let element_ref = elements.iter().find(|e| e.name.local_name == name).unwrap();
        assert_eq!(element_ref.min_occurs, 0, "{name} should be forced optional by the choice");
        assert!(element_ref.is_unbounded(), "{name} should inherit the choice's maxOccurs=unbounded");
    }
}

#[test]
fn recursive_type_is_self_referencing_without_infinite_loop() {
    let graph = resolve("recursive_type.xsd");
    let sub_main = graph.get(&QName::new("urn:test:recursive", "SubMainType")).expect("SubMainType missing");
    let Kind::Element { elements, .. } = &sub_main.kind else {
        panic!("SubMainType should resolve to an Element kind");
    };
    let self_ref = elements.iter().find(|e| e.name.local_name == "SubMain").unwrap();
    assert_eq!(self_ref.type_name, QName::new("urn:test:recursive", "SubMainType"));
    assert_eq!(self_ref.min_occurs, 0);
    assert!(self_ref.is_unbounded());
}

#[test]
fn skip_processing_subtree_sets_flag_on_enclosing_type() {
    let graph = resolve("skip_processing.xsd");
    let property = graph
        .get(&QName::new("urn:test:skip", "PropertyType"))
        .expect("PropertyType missing");
    let Kind::Element { flags, .. } = &property.kind else {
        panic!("PropertyType should resolve to an Element kind");
    };
    assert!(flags.skip_process_contents);
}

#[test]
fn every_referenced_type_is_present_in_the_graph() {
    for fixture_name in [
        "attributes_with_defaults.xsd",
        "substitution_group.xsd",
        "choice_under_sequence.xsd",
        "recursive_type.xsd",
        "skip_processing.xsd",
    ] {
        let graph = resolve(fixture_name);
        assert!(
            graph.find_dangling_reference().is_none(),
            "{fixture_name} produced a dangling reference"
        );
    }
}
