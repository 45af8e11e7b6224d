//! Exercises the full resolve → generate pipeline end to end. Unlike
//! `xsd-resolver`'s own scenario tests (which stop at the Type Graph),
//! these confirm the emitted source is syntactically valid Rust — parsed
//! with `syn` rather than compiled, since the harness this was built
//! under never invokes `rustc`/`cargo` — and spot-check the generated
//! item names a consumer would actually reach for.

fn fixture(name: &str) -> String {
    format!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/{}"), name)
}

fn generate(fixture_name: &str) -> String {
    let graph = xsd_resolver::resolve(&fixture(fixture_name), &[], false).expect("resolution should succeed");
    let options = xsd_generator::EmitOptions { exclude_namespaces: Vec::new() };
    xsd_generator::generate(&graph, &options)
}

fn assert_valid_rust(source: &str) -> syn::File {
    syn::parse_file(source).unwrap_or_else(|err| panic!("generated source failed to parse: {err}\n---\n{source}"))
}

#[test]
fn attributes_with_defaults_generates_valid_rust_with_expected_fields() {
    let source = generate("attributes_with_defaults.xsd");
    assert_valid_rust(&source);
    assert!(source.contains("struct"));
    assert!(source.contains("required"));
    assert!(source.contains("optional_with_default"));
    assert!(source.contains("pub static ROOT_INFO"));
    assert!(source.contains("pub type RootType"));
    assert!(source.contains("pub fn load_data"));
    assert!(source.contains("pub fn load_file"));
}

#[test]
fn substitution_group_generates_a_variant_enum() {
    let source = generate("substitution_group.xsd");
    let file = assert_valid_rust(&source);
    let has_group_enum = file.items.iter().any(|item| matches!(item, syn::Item::Enum(e) if e.ident.to_string().to_lowercase().contains("property")));
    assert!(has_group_enum, "expected an enum covering the Property substitution group in:\n{source}");
    assert!(source.contains("Vec<"), "substitution-group field should be Vec-typed:\n{source}");
    // `derive(Default)` rejects `#[default]` on a tuple variant; the enum
    // must get a hand-written `impl Default` instead.
    assert!(
        !source.contains("#[default]"),
        "a tuple-variant enum must not derive Default via #[default]:\n{source}"
    );
    assert!(source.contains("impl Default for"), "expected a manual Default impl:\n{source}");
}

#[test]
fn choice_under_sequence_generates_two_independent_sibling_fields() {
    let source = generate("choice_under_sequence.xsd");
    assert_valid_rust(&source);
    assert!(source.contains("choice_a") || source.contains("ChoiceA"));
    assert!(source.contains("choice_b") || source.contains("ChoiceB"));
}

#[test]
fn recursive_type_generates_a_boxed_or_vec_indirected_self_reference() {
    let source = generate("recursive_type.xsd");
    let file = assert_valid_rust(&source);
    let sub_main_struct = file.items.iter().find_map(|item| match item {
        syn::Item::Struct(s) if s.ident.to_string().contains("SubMain") => Some(s),
        _ => None,
    });
    assert!(sub_main_struct.is_some(), "expected a SubMain* struct in:\n{source}");
}

#[test]
fn skip_processing_generates_a_text_field() {
    let source = generate("skip_processing.xsd");
    assert_valid_rust(&source);
    assert!(source.contains("pub text: String"), "skip-processing type should still carry a text field:\n{source}");
    assert!(source.contains("skip_processing: true"));
}

#[test]
fn excluded_namespace_suppresses_its_types() {
    // `-e` assumes the named namespace's types are linked in separately
    // (§6.3) — the emitter still allocates idents for cross-references
    // into it, it just stops emitting their bodies.
    let graph = xsd_resolver::resolve(&fixture("substitution_group.xsd"), &[], false).unwrap();
    let options = xsd_generator::EmitOptions { exclude_namespaces: vec!["urn:test:subgroup".to_string()] };
    let source = xsd_generator::generate(&graph, &options);
    assert_valid_rust(&source);
    assert!(
        !source.contains("struct BooleanProperty") && !source.contains("struct FloatingPointProperty"),
        "excluded namespace's types should not get emitted bodies:\n{source}"
    );
}
