//! Walks a resolved [`xsd_resolver::graph::TypeGraph`] and writes Rust
//! source: one declaration per Type Graph entry (§6.1) plus, for every
//! `Element`-kind type, the `xsd_runtime` descriptor tables that drive
//! the streaming parser (§6.2).
//!
//! Grounded on `generator/src/generators/rust.rs` (the teacher's
//! `syn`/`parse_quote!`/`prettyplease` emission pipeline and its
//! visited-set dedup idiom from `generators/common.rs`) — retargeted
//! from the teacher's arena-based `SchemaComponentTable` to the flat
//! `TypeGraph`, and extended to also emit the descriptor tables the
//! teacher's own emitter never produced (its runtime used a different,
//! DOM-walking validator).
//!
//! The Type Graph's shape (§3) and the descriptor table layout (§6.2)
//! are normative; everything else here — identifier allocation, how a
//! struct's fields are laid out, how substitution groups and non-string
//! simple-typed leaf elements are represented — is emitter-internal
//! layout, which spec.md §2 explicitly leaves as implementation
//! freedom.

use std::collections::HashMap;

use heck::ToShoutySnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{__private::Span, parse_quote, Field, FieldMutability, Ident, Item};

use xsd_resolver::graph::{AttributeDescriptor, ElementFlags, ElementRef, Kind, Type, TypeGraph};
use xsd_resolver::QName;

use crate::ident::{const_ident, field_ident, type_ident};

pub struct EmitOptions {
    /// Namespaces suppressed from emission — assumed linked from
    /// elsewhere, per the CLI's `-e/--exclude-namespace` (§6.3).
    pub exclude_namespaces: Vec<String>,
}

pub fn generate(graph: &TypeGraph, options: &EmitOptions) -> String {
    let mut emitter = Emitter::new(graph, options);
    emitter.run();
    let file = syn::File {
        shebang: None,
        attrs: Vec::new(),
        items: emitter.items,
    };
    prettyplease::unparse(&file)
}

struct IdentAllocator {
    used: HashMap<String, u32>,
    assigned: HashMap<QName, Ident>,
}

impl IdentAllocator {
    fn new() -> Self {
        Self { used: HashMap::new(), assigned: HashMap::new() }
    }

    /// Returns the previously allocated identifier for `name`, or mints
    /// and remembers a fresh one — disambiguating same-local-name types
    /// from different namespaces with a numeric suffix.
    fn get_or_allocate(&mut self, name: &QName) -> Ident {
        if let Some(ident) = self.assigned.get(name) {
            return ident.clone();
        }
        let base = type_ident(&name.local_name).to_string();
        let count = self.used.entry(base.clone()).or_insert(0);
        let candidate = if *count == 0 { base } else { format!("{base}_{count}") };
        *count += 1;
        let ident = Ident::new(&candidate, Span::call_site());
        self.assigned.insert(name.clone(), ident.clone());
        ident
    }
}

struct Emitter<'g> {
    graph: &'g TypeGraph,
    exclude: Vec<String>,
    idents: IdentAllocator,
    /// Memoized synthetic wrapper structs for child elements whose type
    /// resolves to a non-`Element`-kind Type (§9's open question: only
    /// built-in String children are promoted by the resolver itself;
    /// everything else — numerics, enums, lists, unions used directly as
    /// a child element's type — gets a minimal raw-text leaf wrapper here
    /// so the generated parser has somewhere to recurse into). Keyed by
    /// the referenced type's name so repeated references share one
    /// wrapper.
    leaf_wrappers: HashMap<QName, Ident>,
    /// Types referenced directly by `_root_t`'s own element list — the
    /// actual document root candidates. `parse()` descends straight from
    /// `_root_t`'s state into one of these on the first token (§4.3.3's
    /// "entry level"), so these are the types whose `ElementInfoFlags`
    /// need `level1` set, not the synthetic `_root_t` wrapper itself.
    root_candidate_types: std::collections::HashSet<QName>,
    items: Vec<Item>,
}

impl<'g> Emitter<'g> {
    fn new(graph: &'g TypeGraph, options: &EmitOptions) -> Self {
        let root_candidate_types = graph
            .root_type
            .as_ref()
            .and_then(|root| graph.get(root))
            .map(|ty| match &ty.kind {
                Kind::Element { elements, .. } => elements.iter().map(|e| e.type_name.clone()).collect(),
                _ => std::collections::HashSet::new(),
            })
            .unwrap_or_default();
        Self {
            graph,
            exclude: options.exclude_namespaces.clone(),
            idents: IdentAllocator::new(),
            leaf_wrappers: HashMap::new(),
            root_candidate_types,
            items: Vec::new(),
        }
    }

    fn excluded(&self, name: &QName) -> bool {
        self.exclude.iter().any(|ns| ns == &name.namespace)
    }

    fn run(&mut self) {
        let mut names: Vec<QName> = self.graph.iter().map(|ty| ty.name.clone()).collect();
        names.sort();

        // Identifiers are allocated for every type up front (even
        // excluded ones) so references from non-excluded types stay
        // stable regardless of iteration order.
        for name in &names {
            self.idents.get_or_allocate(name);
        }

        for name in &names {
            if self.excluded(name) {
                continue;
            }
            let ty = self.graph.get(name).expect("name collected from graph.iter()");
            self.emit_type(ty);
        }

        // The runtime matches `xmlns`/`xmlns:prefix` declarations against
        // this list by position (§4.3.2); `xsd_runtime::parse` takes it
        // as a parameter rather than baking it into a descriptor table
        // since it's document-wide, not per-element.
        let mut namespaces: Vec<String> = names
            .iter()
            .map(|n| n.namespace.clone())
            .filter(|ns| !ns.is_empty() && ns != xsd_resolver::qname::XSD_NAMESPACE && ns != xsd_resolver::qname::XML_NAMESPACE)
            .collect();
        namespaces.sort();
        namespaces.dedup();
        let namespace_literals = namespaces.iter().map(|ns| ns.as_str());
        self.items.push(parse_quote! {
            pub static NAMESPACES: &[&str] = &[#(#namespace_literals),*];
        });

        // Named per-namespace constants, favouring the schema author's own
        // prefix (§4.1's suggested-prefix table) over a synthesized `NS0`/
        // `NS1` fallback, so generated code reads the way the schema does.
        for (index, ns) in namespaces.iter().enumerate() {
            let prefix = self.graph.namespace_to_suggested_prefix.get(ns).map(String::as_str);
            let const_ident = namespace_const_ident(prefix, index);
            let literal = ns.as_str();
            self.items.push(parse_quote! {
                pub const #const_ident: &str = #literal;
            });
        }

        if let Some(root) = self.graph.root_type.clone() {
            let root_ident = self.idents.get_or_allocate(&root);
            let info_ident = const_ident("INFO", &root_ident.to_string());
            self.items.push(parse_quote! {
                pub type RootType = #root_ident;
            });
            self.items.push(parse_quote! {
                pub static ROOT_INFO: &xsd_runtime::ElementInfo = &#info_ident;
            });

            // §6.1's two generated entry points. `load_file` is a thin
            // wrapper over `load_data`, matching the original's
            // Reader/XmlParser split (file handling stays outside the
            // streaming tokenizer itself).
            self.items.push(parse_quote! {
                pub fn load_data(xml_text: &str, out_root: &mut RootType) -> xsd_runtime::Result<()> {
                    xsd_runtime::parse(xml_text, NAMESPACES, out_root, ROOT_INFO)
                }
            });
            self.items.push(parse_quote! {
                pub fn load_file(path: &str, out_root: &mut RootType) -> xsd_runtime::Result<()> {
                    let xml_text = std::fs::read_to_string(path).map_err(|source| xsd_runtime::ParseError::FileUnreadable {
                        path: path.to_string(),
                        source,
                    })?;
                    load_data(&xml_text, out_root)
                }
            });
        }
    }

    fn emit_type(&mut self, ty: &Type) {
        let ident = self.idents.get_or_allocate(&ty.name);
        match &ty.kind {
            Kind::Base { base_name } => self.emit_base(ident, base_name),
            Kind::String => self.items.push(parse_quote! { pub type #ident = String; }),
            Kind::SimpleRef { base_type } => {
                let base_ident = self.idents.get_or_allocate(base_type);
                self.items.push(parse_quote! { pub type #ident = #base_ident; });
            }
            Kind::Enum { enum_values } => self.emit_enum(ident, enum_values),
            Kind::Union { member_types } => self.emit_union(ident, member_types),
            Kind::List { item_type } => {
                let item_ident = self.idents.get_or_allocate(item_type);
                self.items.push(parse_quote! { pub type #ident = Vec<#item_ident>; });
            }
            Kind::Element { base_type, attributes, elements, flags } => {
                self.emit_element(&ty.name, ident, base_type.as_ref(), attributes, elements, *flags);
            }
            Kind::SubstitutionGroup { elements } => self.emit_substitution_group(ident, elements),
        }
    }

    fn emit_base(&mut self, ident: Ident, base_name: &str) {
        let scalar = match base_name {
            "int" => "i32",
            "long" | "integer" => "i64",
            "short" => "i16",
            "unsignedInt" => "u32",
            "unsignedLong" | "nonNegativeInteger" | "positiveInteger" => "u64",
            "unsignedShort" => "u16",
            "decimal" | "double" => "f64",
            "float" => "f32",
            "boolean" => "bool",
            other => {
                log::warn!("unrecognized builtin base name '{other}', emitting as String");
                "String"
            }
        };
        let scalar_ident = Ident::new(scalar, Span::call_site());
        self.items.push(parse_quote! { pub type #ident = #scalar_ident; });
    }

    fn emit_enum(&mut self, ident: Ident, enum_values: &[String]) {
        let variant_idents = dedup_variant_idents(enum_values);
        let values_const = const_ident("VALUES", &ident.to_string());
        let literals = enum_values.iter().map(|v| v.as_str());
        self.items.push(parse_quote! {
            pub static #values_const: &[&str] = &[#(#literals),*];
        });

        let first_variant = variant_idents.first().cloned();
        let variants = variant_idents.iter();
        let default_attr: TokenStream = match &first_variant {
            Some(_) => quote! { #[default] },
            None => quote! {},
        };
        // Only the first variant gets the `#[default]` attribute; the
        // rest are plain. `parse_quote!` can't interpolate a list where
        // one element differs, so build each variant token individually.
        let mut variant_tokens = Vec::new();
        for (index, v) in variants.enumerate() {
            if index == 0 {
                variant_tokens.push(quote! { #default_attr #v });
            } else {
                variant_tokens.push(quote! { #v });
            }
        }

        self.items.push(parse_quote! {
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
            pub enum #ident {
                #(#variant_tokens),*
            }
        });

        let from_index_arms = variant_idents.iter().enumerate().map(|(i, v)| {
            let i = i as u32;
            quote! { #i => #ident::#v }
        });
        let as_str_arms = variant_idents.iter().enumerate().map(|(i, v)| {
            let lit = &enum_values[i];
            quote! { #ident::#v => #lit }
        });
        self.items.push(parse_quote! {
            impl #ident {
                pub fn from_index(index: u32) -> Self {
                    match index {
                        #(#from_index_arms,)*
                        _ => panic!("enum index out of range for {}", stringify!(#ident)),
                    }
                }

                pub fn as_str(&self) -> &'static str {
                    match self {
                        #(#as_str_arms),*
                    }
                }
            }
        });

        // §6.1 requires a `to_string` surface on generated enumerations;
        // a `Display` impl gets that for free via the standard blanket
        // `ToString` impl.
        self.items.push(parse_quote! {
            impl ::std::fmt::Display for #ident {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        });
    }

    fn emit_union(&mut self, ident: Ident, member_types: &[QName]) {
        let member_idents: Vec<Ident> = member_types.iter().map(|m| self.idents.get_or_allocate(m)).collect();
        let variant_names = dedup_variant_idents(
            &member_types.iter().map(|m| m.local_name.clone()).collect::<Vec<_>>(),
        );

        let variants: Vec<TokenStream> = variant_names
            .iter()
            .zip(member_idents.iter())
            .map(|(variant, member)| quote! { #variant(#member) })
            .collect();
        self.items.push(parse_quote! {
            #[derive(Debug, Clone)]
            pub enum #ident {
                #(#variants),*
            }
        });
        // `derive(Default)` rejects `#[default]` on a tuple variant, so the
        // first member's own `Default` is forwarded by hand instead.
        let first_variant = &variant_names[0];
        self.items.push(parse_quote! {
            impl Default for #ident {
                fn default() -> Self {
                    #ident::#first_variant(Default::default())
                }
            }
        });
    }

    fn emit_substitution_group(&mut self, ident: Ident, elements: &[ElementRef]) {
        let variant_names = dedup_variant_idents(&elements.iter().map(|e| e.name.local_name.clone()).collect::<Vec<_>>());
        let member_idents: Vec<Ident> = elements.iter().map(|e| self.idents.get_or_allocate(&e.type_name)).collect();

        let variants: Vec<TokenStream> = variant_names
            .iter()
            .zip(member_idents.iter())
            .map(|(variant, member)| quote! { #variant(#member) })
            .collect();
        self.items.push(parse_quote! {
            #[derive(Debug, Clone)]
            pub enum #ident {
                #(#variants),*
            }
        });
        let first_variant = &variant_names[0];
        self.items.push(parse_quote! {
            impl Default for #ident {
                fn default() -> Self {
                    #ident::#first_variant(Default::default())
                }
            }
        });
    }

    fn emit_element(
        &mut self,
        name: &QName,
        ident: Ident,
        base_type: Option<&QName>,
        attributes: &[AttributeDescriptor],
        elements: &[ElementRef],
        flags: ElementFlags,
    ) {
        let is_root = self.graph.root_type.as_ref() == Some(name);
        let structural_base = base_type.filter(|bt| self.graph.get(bt).is_some_and(Type::is_element_like));

        let mut fields: Vec<Field> = Vec::new();
        if let Some(base) = structural_base {
            let base_ident = self.idents.get_or_allocate(base);
            fields.push(plain_field(field_ident("base"), parse_quote!(Box<#base_ident>)));
        }
        for attr in attributes {
            fields.push(self.attribute_field(attr));
        }
        for element_ref in elements {
            fields.push(self.element_field(element_ref, is_root));
        }
        // A skip-processing subtree is captured verbatim into the same text
        // field ReadText populates (§4.3.3), so it needs one even if the
        // type itself isn't `mixed`.
        if flags.read_text || flags.skip_process_contents {
            fields.push(plain_field(field_ident("text"), parse_quote!(String)));
        }
        if flags.any_attribute {
            fields.push(plain_field(field_ident("extra_attributes"), parse_quote!(Vec<(String, String)>)));
        }

        self.items.push(Item::Struct(syn::ItemStruct {
            attrs: vec![parse_quote!(#[derive(Debug, Clone, Default)])],
            vis: parse_quote!(pub),
            struct_token: Default::default(),
            ident: ident.clone(),
            generics: Default::default(),
            fields: syn::Fields::Named(syn::FieldsNamed {
                brace_token: Default::default(),
                named: fields.into_iter().collect(),
            }),
            semi_token: None,
        }));

        let is_document_root = self.root_candidate_types.contains(name);
        self.emit_element_tables(name, &ident, structural_base, attributes, elements, flags, is_root, is_document_root);
    }

    fn attribute_field(&mut self, attr: &AttributeDescriptor) -> Field {
        let name = field_ident(&attr.name.local_name);
        let type_ident = self.idents.get_or_allocate(&attr.type_name);
        let ty: syn::Type = if attr.is_mandatory || attr.default_value.is_some() {
            parse_quote!(#type_ident)
        } else {
            parse_quote!(Option<#type_ident>)
        };
        plain_field(name, ty)
    }

    fn element_field(&mut self, element_ref: &ElementRef, is_root: bool) -> Field {
        let name = field_ident(&element_ref.name.local_name);
        let type_ident = self.child_type_ident(&element_ref.type_name);
        let is_substitution_group =
            matches!(self.graph.get(&element_ref.type_name).map(|t| &t.kind), Some(Kind::SubstitutionGroup { .. }));
        let ty = if is_root {
            parse_quote!(Option<#type_ident>)
        } else if is_substitution_group {
            // Every member tag shares this one field (see
            // `group_member_child_info`), whose get-field closure always
            // pushes — so the field is always a `Vec`, regardless of the
            // reference's own occurs bounds.
            parse_quote!(Vec<#type_ident>)
        } else {
            occurs_type(parse_quote!(#type_ident), element_ref.min_occurs, element_ref.max_occurs)
        };
        plain_field(name, ty)
    }

    /// The Rust type a child-element slot is stored as: the target
    /// type's own identifier if it's `Element`/`SubstitutionGroup`-kind,
    /// else a memoized synthetic leaf wrapper (see
    /// [`Emitter::leaf_wrappers`]).
    fn child_type_ident(&mut self, type_name: &QName) -> Ident {
        match self.graph.get(type_name) {
            Some(ty) if ty.is_element_like() => self.idents.get_or_allocate(type_name),
            _ => self.leaf_wrapper_ident(type_name),
        }
    }

    fn leaf_wrapper_ident(&mut self, type_name: &QName) -> Ident {
        if let Some(ident) = self.leaf_wrappers.get(type_name) {
            return ident.clone();
        }
        let base = self.idents.get_or_allocate(type_name);
        let ident = Ident::new(&format!("{base}Leaf"), Span::call_site());
        self.leaf_wrappers.insert(type_name.clone(), ident.clone());

        self.items.push(parse_quote! {
            #[derive(Debug, Clone, Default)]
            pub struct #ident {
                pub text: String,
            }
        });

        let info_ident = const_ident("INFO", &ident.to_string());
        self.items.push(parse_quote! {
            pub static #info_ident: xsd_runtime::ElementInfo = xsd_runtime::ElementInfo {
                flags: xsd_runtime::ElementInfoFlags {
                    level1: false,
                    read_text: true,
                    skip_processing: false,
                    any_attribute: false,
                },
                children: &[],
                mandatory_children_count: 0,
                attributes: &[],
                text_field: Some(#ident::__text_field),
                any_attribute_sink: None,
                base: None,
            };
        });
        self.items.push(parse_quote! {
            impl #ident {
                fn __text_field(element: &mut dyn ::std::any::Any) -> &mut String {
                    &mut element.downcast_mut::<#ident>().expect("leaf wrapper type mismatch").text
                }
            }
        });

        ident
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_element_tables(
        &mut self,
        name: &QName,
        ident: &Ident,
        structural_base: Option<&QName>,
        attributes: &[AttributeDescriptor],
        elements: &[ElementRef],
        flags: ElementFlags,
        is_root: bool,
        is_document_root: bool,
    ) {
        let attributes_const = const_ident("ATTRIBUTES", &ident.to_string());
        let attribute_entries: Vec<TokenStream> = attributes.iter().map(|a| self.attribute_info(ident, a)).collect();
        self.items.push(parse_quote! {
            pub static #attributes_const: &[xsd_runtime::AttributeInfo] = &[#(#attribute_entries),*];
        });

        let children_const = const_ident("CHILDREN", &ident.to_string());
        let mut child_entries: Vec<TokenStream> = Vec::new();
        let mut mandatory_children_count = 0usize;
        for element_ref in elements {
            let (min_occurs, max_occurs) = if is_root { (0, 1) } else { (element_ref.min_occurs, element_ref.max_occurs) };
            if min_occurs >= 1 {
                mandatory_children_count += 1;
            }
            match self.graph.get(&element_ref.type_name) {
                Some(Type { kind: Kind::SubstitutionGroup { elements: members }, .. }) => {
                    let group_type = element_ref.type_name.clone();
                    let members = members.clone();
                    for member in &members {
                        child_entries.push(self.group_member_child_info(
                            ident,
                            &element_ref.name,
                            &group_type,
                            member,
                            min_occurs,
                            max_occurs,
                        ));
                    }
                }
                _ => {
                    child_entries.push(self.child_info(ident, element_ref, min_occurs, max_occurs));
                }
            }
        }
        self.items.push(parse_quote! {
            pub static #children_const: &[xsd_runtime::ChildElementInfo] = &[#(#child_entries),*];
        });

        let text_field_expr: TokenStream = if flags.read_text || flags.skip_process_contents {
            let fn_ident = Ident::new(&format!("__{ident}_text_field"), Span::call_site());
            self.items.push(parse_quote! {
                #[allow(non_snake_case)]
                fn #fn_ident(element: &mut dyn ::std::any::Any) -> &mut String {
                    &mut element.downcast_mut::<#ident>().expect("text field type mismatch").text
                }
            });
            quote! { Some(#fn_ident) }
        } else {
            quote! { None }
        };

        let any_attribute_sink_expr: TokenStream = if flags.any_attribute {
            let fn_ident = Ident::new(&format!("__{ident}_any_attribute_sink"), Span::call_site());
            self.items.push(parse_quote! {
                #[allow(non_snake_case)]
                fn #fn_ident(element: &mut dyn ::std::any::Any, name: String, value: String) {
                    element.downcast_mut::<#ident>().expect("any-attribute sink type mismatch").extra_attributes.push((name, value));
                }
            });
            quote! { Some(#fn_ident) }
        } else {
            quote! { None }
        };

        let base_expr: TokenStream = match structural_base {
            Some(base) => {
                let base_ident = self.idents.get_or_allocate(base);
                let base_info = const_ident("INFO", &base_ident.to_string());
                quote! { Some(&#base_info) }
            }
            None => quote! { None },
        };

        // §4.3.3's "entry level" is the real document root element, which
        // `parse()` descends into immediately from `_root_t`'s own state —
        // never `_root_t` itself, which never sees a `set_attribute` call.
        let level1 = is_document_root;
        let read_text = flags.read_text || flags.skip_process_contents;
        let skip_processing = flags.skip_process_contents;
        let any_attribute = flags.any_attribute;

        let info_ident = const_ident("INFO", &ident.to_string());
        self.items.push(parse_quote! {
            pub static #info_ident: xsd_runtime::ElementInfo = xsd_runtime::ElementInfo {
                flags: xsd_runtime::ElementInfoFlags {
                    level1: #level1,
                    read_text: #read_text,
                    skip_processing: #skip_processing,
                    any_attribute: #any_attribute,
                },
                children: #children_const,
                mandatory_children_count: #mandatory_children_count,
                attributes: #attributes_const,
                text_field: #text_field_expr,
                any_attribute_sink: #any_attribute_sink_expr,
                base: #base_expr,
            };
        });
    }

    fn attribute_info(&mut self, parent_ident: &Ident, attr: &AttributeDescriptor) -> TokenStream {
        let field = field_ident(&attr.name.local_name);
        let name_literal = attr.name.local_name.as_str();
        let setter_ident = Ident::new(&format!("__{parent_ident}_set_{field}"), Span::call_site());
        let wraps_in_option = !(attr.is_mandatory || attr.default_value.is_some());
        let coerced = self.coerce_result_expr(&attr.type_name, quote! { value.as_str() });
        let assign: TokenStream = if wraps_in_option {
            quote! { Some((#coerced)?) }
        } else {
            quote! { (#coerced)? }
        };
        self.items.push(parse_quote! {
            #[allow(non_snake_case)]
            fn #setter_ident(element: &mut dyn ::std::any::Any, position: xsd_runtime::Position, value: String) -> xsd_runtime::Result<()> {
                let element = element.downcast_mut::<#parent_ident>().expect("attribute setter type mismatch");
                element.#field = #assign;
                Ok(())
            }
        });

        let default_expr: TokenStream = match &attr.default_value {
            Some(default_value) => {
                let default_fn_ident = Ident::new(&format!("__{parent_ident}_default_{field}"), Span::call_site());
                let default_coerced = self.coerce_result_expr(&attr.type_name, quote! { value.as_str() });
                self.items.push(parse_quote! {
                    #[allow(non_snake_case)]
                    fn #default_fn_ident(element: &mut dyn ::std::any::Any) {
                        let element = element.downcast_mut::<#parent_ident>().expect("default setter type mismatch");
                        let position = xsd_runtime::Position { line: 0 };
                        let value: String = #default_value.to_string();
                        element.#field = (#default_coerced).expect("invalid default value declared in schema");
                    }
                });
                quote! { Some(#default_fn_ident) }
            }
            None => quote! { None },
        };

        let is_mandatory = attr.is_mandatory;
        quote! {
            xsd_runtime::AttributeInfo {
                name: #name_literal,
                set_attribute: #setter_ident,
                is_mandatory: #is_mandatory,
                set_default_value: #default_expr,
            }
        }
    }

    /// Builds an expression of type `xsd_runtime::Result<RustTypeOf(type_name)>`
    /// from a `&str` token stream, recursing through `SimpleRef`/`List`/
    /// `Union` the way §4.2.3/§4.3.5 define their semantics.
    fn coerce_result_expr(&mut self, type_name: &QName, value: TokenStream) -> TokenStream {
        match self.graph.get(type_name).map(|t| &t.kind) {
            Some(Kind::Base { base_name }) => {
                let parse_fn = scalar_parser_fn(base_name);
                quote! { xsd_runtime::scalars::#parse_fn(position, #value) }
            }
            Some(Kind::String) => quote! { Ok::<String, xsd_runtime::ParseError>((#value).to_string()) },
            Some(Kind::SimpleRef { base_type }) => {
                let base_type = base_type.clone();
                self.coerce_result_expr(&base_type, value)
            }
            Some(Kind::Enum { .. }) => {
                let enum_ident = self.idents.get_or_allocate(type_name);
                let values_const = const_ident("VALUES", &enum_ident.to_string());
                quote! { xsd_runtime::scalars::parse_enum_value(position, #values_const, #value).map(#enum_ident::from_index) }
            }
            Some(Kind::List { item_type }) => {
                let item_type = item_type.clone();
                let item_expr = self.coerce_result_expr(&item_type, quote! { tok });
                quote! {
                    (#value)
                        .split_whitespace()
                        .filter(|tok| !tok.is_empty())
                        .map(|tok| #item_expr)
                        .collect::<xsd_runtime::Result<Vec<_>>>()
                }
            }
            Some(Kind::Union { member_types }) => {
                let union_ident = self.idents.get_or_allocate(type_name);
                let member_types = member_types.clone();
                let variant_names =
                    dedup_variant_idents(&member_types.iter().map(|m| m.local_name.clone()).collect::<Vec<_>>());
                let mut attempts = Vec::new();
                for (member_type, variant) in member_types.iter().zip(variant_names.iter()) {
                    let member_expr = self.coerce_result_expr(member_type, value.clone());
                    attempts.push(quote! {
                        if let Ok(v) = (#member_expr) {
                            return Ok(#union_ident::#variant(v));
                        }
                    });
                }
                quote! {
                    (|| -> xsd_runtime::Result<#union_ident> {
                        #(#attempts)*
                        Err(xsd_runtime::ParseError::Verification {
                            line: position.line,
                            message: "Expected one of the union's member type values".to_string(),
                        })
                    })()
                }
            }
            Some(Kind::Element { .. } | Kind::SubstitutionGroup { .. }) | None => {
                quote! {
                    Err(xsd_runtime::ParseError::Verification {
                        line: position.line,
                        message: "Unsupported attribute type".to_string(),
                    })
                }
            }
        }
    }

    fn child_info(&mut self, parent_ident: &Ident, element_ref: &ElementRef, min_occurs: u32, max_occurs: u32) -> TokenStream {
        let field = field_ident(&element_ref.name.local_name);
        let name_literal = element_ref.name.local_name.as_str();
        let child_type_ident = self.child_type_ident(&element_ref.type_name);
        let get_field_ident = Ident::new(&format!("__{parent_ident}_get_{field}"), Span::call_site());
        let info_expr = self.child_info_ref(&element_ref.type_name);

        let body: TokenStream = if is_singular(min_occurs, max_occurs) {
            if min_occurs == 0 {
                quote! {
                    element.#field.get_or_insert_with(Default::default) as &mut dyn ::std::any::Any
                }
            } else {
                quote! {
                    &mut element.#field as &mut dyn ::std::any::Any
                }
            }
        } else {
            quote! {
                element.#field.push(<#child_type_ident as Default>::default());
                element.#field.last_mut().unwrap() as &mut dyn ::std::any::Any
            }
        };

        self.items.push(parse_quote! {
            #[allow(non_snake_case)]
            fn #get_field_ident(parent: &mut dyn ::std::any::Any) -> &mut dyn ::std::any::Any {
                let element = parent.downcast_mut::<#parent_ident>().expect("child field type mismatch");
                #body
            }
        });

        quote! {
            xsd_runtime::ChildElementInfo {
                name: #name_literal,
                get_field: #get_field_ident,
                info: #info_expr,
                min_occurs: #min_occurs as usize,
                max_occurs: #max_occurs as usize,
            }
        }
    }

    /// A substitution-group member shares the parent's single `Vec`
    /// field (named after the group reference) but is matched by its
    /// own tag name and dispatches into its own `ElementInfo`/variant.
    /// `min_occurs`/`max_occurs` are the *group reference's* bounds, so
    /// occurrence is tracked per alternative name rather than pooled
    /// across the whole group — a documented simplification (DESIGN.md),
    /// parallel to spec.md §9's accepted `choice`-flattening one.
    fn group_member_child_info(
        &mut self,
        parent_ident: &Ident,
        group_field_name: &QName,
        group_type: &QName,
        member: &ElementRef,
        min_occurs: u32,
        max_occurs: u32,
    ) -> TokenStream {
        let field = field_ident(&group_field_name.local_name);
        let name_literal = member.name.local_name.as_str();
        let group_enum_ident = self.idents.get_or_allocate(group_type);
        let variant_names = self.substitution_group_variant_names(group_type);
        let member_index = self
            .graph
            .get(group_type)
            .and_then(|t| match &t.kind {
                Kind::SubstitutionGroup { elements } => elements.iter().position(|e| e.name == member.name),
                _ => None,
            })
            .unwrap_or(0);
        let variant = variant_names.get(member_index).cloned().unwrap_or_else(|| Ident::new("Unknown", Span::call_site()));
        let member_type_ident = self.idents.get_or_allocate(&member.type_name);

        let get_field_ident =
            Ident::new(&format!("__{parent_ident}_get_{field}_{}", member.name.local_name), Span::call_site());
        self.items.push(parse_quote! {
            #[allow(non_snake_case)]
            fn #get_field_ident(parent: &mut dyn ::std::any::Any) -> &mut dyn ::std::any::Any {
                let element = parent.downcast_mut::<#parent_ident>().expect("substitution-group field type mismatch");
                element.#field.push(#group_enum_ident::#variant(<#member_type_ident as Default>::default()));
                match element.#field.last_mut().unwrap() {
                    #group_enum_ident::#variant(inner) => inner as &mut dyn ::std::any::Any,
                    _ => unreachable!(),
                }
            }
        });

        let info_ident = const_ident("INFO", &member_type_ident.to_string());
        quote! {
            xsd_runtime::ChildElementInfo {
                name: #name_literal,
                get_field: #get_field_ident,
                info: &#info_ident,
                min_occurs: #min_occurs as usize,
                max_occurs: #max_occurs as usize,
            }
        }
    }

    fn substitution_group_variant_names(&self, group_type: &QName) -> Vec<Ident> {
        match self.graph.get(group_type).map(|t| &t.kind) {
            Some(Kind::SubstitutionGroup { elements }) => {
                dedup_variant_idents(&elements.iter().map(|e| e.name.local_name.clone()).collect::<Vec<_>>())
            }
            _ => Vec::new(),
        }
    }

    fn child_info_ref(&mut self, type_name: &QName) -> TokenStream {
        let ident = self.child_type_ident(type_name);
        let info_ident = const_ident("INFO", &ident.to_string());
        quote! { &#info_ident }
    }
}

fn is_singular(min_occurs: u32, max_occurs: u32) -> bool {
    max_occurs == 1
}

/// Names a namespace constant after its suggested prefix, falling back to
/// `NS<index>` when the loader never saw one (§4.1 output).
fn namespace_const_ident(prefix: Option<&str>, index: usize) -> Ident {
    let name = match prefix.filter(|p| !p.is_empty()) {
        Some(p) => p.to_shouty_snake_case(),
        None => format!("NS{index}"),
    };
    let name = if name.is_empty() { format!("NS{index}") } else { name };
    let safe = if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    };
    Ident::new(&safe, Span::call_site())
}

fn occurs_type(inner: syn::Type, min_occurs: u32, max_occurs: u32) -> syn::Type {
    if is_singular(min_occurs, max_occurs) {
        if min_occurs == 0 {
            parse_quote!(Option<#inner>)
        } else {
            inner
        }
    } else {
        parse_quote!(Vec<#inner>)
    }
}

fn plain_field(name: Ident, ty: syn::Type) -> Field {
    Field {
        attrs: Vec::new(),
        vis: parse_quote!(pub),
        mutability: FieldMutability::None,
        ident: Some(name),
        colon_token: Some(Default::default()),
        ty,
    }
}

fn scalar_parser_fn(base_name: &str) -> Ident {
    let fn_name = match base_name {
        "int" => "parse_i32",
        "long" | "integer" => "parse_i64",
        "short" => "parse_i16",
        "unsignedInt" => "parse_u32",
        "unsignedLong" | "nonNegativeInteger" | "positiveInteger" => "parse_u64",
        "unsignedShort" => "parse_u16",
        "decimal" | "double" => "parse_f64",
        "float" => "parse_f32",
        "boolean" => "parse_bool",
        _ => "parse_f64",
    };
    Ident::new(fn_name, Span::call_site())
}

/// Builds unique `PascalCase` variant identifiers for a list of raw
/// strings (enum values, union/substitution-group member names),
/// suffixing on collision since §3.5 allows duplicate enum values.
fn dedup_variant_idents(values: &[String]) -> Vec<Ident> {
    let mut seen: HashMap<String, u32> = HashMap::new();
    values
        .iter()
        .map(|v| {
            let base = type_ident(v).to_string();
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 { base } else { format!("{base}_{count}") };
            *count += 1;
            Ident::new(&name, Span::call_site())
        })
        .collect()
}
