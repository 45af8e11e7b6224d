//! Schema Resolver, §4.2. Walks the file forest built by [`crate::loader`]
//! and flattens it into a [`TypeGraph`].
//!
//! Grounded on `original_source/src/Reader.cpp`'s `Reader` class
//! (`processType`/`processTypeElement`/`processXsElement`/
//! `processXsAttribute`/`processXsAllEtAl`/`resolveElementRefs`), which
//! already implements exactly the flattened model spec.md describes.
//! Element/attribute *tag* matching uses roxmltree's own namespace
//! resolution (`tag_name().namespace()`) instead of hand-tracked prefix
//! maps — roxmltree resolves element and attribute names against
//! `xmlns` declarations the way any namespace-aware XML reader does.
//! Prefix maps are still needed, and still hand-tracked, for resolving
//! QName-valued *attribute content* (`type="tns:Foo"`, `base=`, `ref=`,
//! `substitutionGroup=`, `memberTypes=`, `itemType=`) — roxmltree has no
//! way to know those strings are QNames.

use roxmltree::{Document, Node};

use crate::builtins::{is_xsd_numeric_base_type, is_xsd_string_base_type};
use crate::error::{Result, XsdError};
use crate::graph::{AttributeDescriptor, ElementFlags, ElementRef, Kind, Type, TypeGraph, ROOT_TYPE_LOCAL_NAME};
use crate::loader::SchemaForest;
use crate::qname::{QName, XSD_NAMESPACE};

#[derive(Clone, Copy)]
struct Position<'a> {
    node: Node<'a, 'a>,
    file_index: usize,
}

pub struct Resolver<'a> {
    forest: &'a SchemaForest,
    docs: Vec<Document<'a>>,
    graph: TypeGraph,
}

impl<'a> Resolver<'a> {
    pub fn new(forest: &'a SchemaForest) -> Result<Self> {
        let options = roxmltree::ParsingOptions { allow_dtd: forest.allow_dtd, ..Default::default() };
        let docs = forest
            .files
            .iter()
            .map(|f| {
                Document::parse_with_options(&f.content, options).map_err(|source| XsdError::XmlParseFailed {
                    path: f.path.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            forest,
            docs,
            graph: TypeGraph::new(),
        })
    }

    /// Runs the full resolution pass (§4.2.1) and returns the frozen
    /// Type Graph. `force_types` names local types in the primary
    /// namespace to resolve even if never referenced.
    pub fn run(mut self, force_types: &[String]) -> Result<TypeGraph> {
        let mut root_elements = Vec::new();

        for (file_index, file) in self.forest.files.iter().enumerate() {
            let root = self.docs[file_index].root_element();
            for child in root.children().filter(|n| n.is_element()) {
                if !is_xsd_tag(child, "element") {
                    continue;
                }
                let position = Position { node: child, file_index };
                let mut element_ref = blank_element_ref();
                self.process_xs_element(position, &QName::local(""), &mut element_ref, true)?;

                if element_ref.name.local_name.is_empty() || element_ref.type_name.local_name.is_empty() {
                    continue;
                }

                let is_primary = file.target_namespace == self.forest.primary_namespace();
                let is_abstract = child.attribute("abstract") == Some("true");
                let is_substituting = child.attribute("substitutionGroup").is_some();
                if !is_primary || is_abstract || is_substituting {
                    continue;
                }

                match self.graph.get(&element_ref.type_name) {
                    Some(ty) if matches!(ty.kind, Kind::Element { .. }) => root_elements.push(element_ref),
                    _ => continue,
                }
            }
        }

        let primary_namespace = self.forest.primary_namespace().to_string();
        for forced in force_types {
            self.process_type(QName::new(primary_namespace.clone(), forced.clone()))?;
        }

        if root_elements.is_empty() {
            return Err(XsdError::RootElementNotFound);
        }

        let root_name = QName::local(ROOT_TYPE_LOCAL_NAME);
        self.graph.insert(Type::new(
            root_name.clone(),
            Kind::Element {
                base_type: None,
                attributes: Vec::new(),
                elements: root_elements,
                flags: ElementFlags::default(),
            },
        ));
        self.graph.root_type = Some(root_name);

        self.resolve_element_refs();

        self.graph.namespace_to_suggested_prefix = self.forest.namespace_to_suggested_prefix.clone();
        Ok(self.graph)
    }

    /// §4.2.6: promotes `ref_name`-carrying element references that
    /// turned out to point at a substitution-group head.
    fn resolve_element_refs(&mut self) {
        let group_names: std::collections::HashSet<QName> = self
            .graph
            .iter()
            .filter(|ty| matches!(ty.kind, Kind::SubstitutionGroup { .. }))
            .map(|ty| ty.name.clone())
            .collect();

        for ty in self.graph.iter_mut() {
            let elements = match &mut ty.kind {
                Kind::Element { elements, .. } | Kind::SubstitutionGroup { elements } => elements,
                _ => continue,
            };
            for element_ref in elements.iter_mut() {
                let Some(head) = element_ref.ref_name.take() else {
                    continue;
                };
                let group_name = head.with_suffix("_group_t");
                if group_names.contains(&group_name) {
                    element_ref.type_name = group_name;
                }
            }
        }
    }

    // -- type processing (§4.2.3) --------------------------------------

    fn process_type(&mut self, name: QName) -> Result<()> {
        if self.graph.contains(&name) {
            return Ok(());
        }
        if is_xsd_string_base_type(&name) {
            self.graph.insert(Type::new(name, Kind::String));
            return Ok(());
        }
        if is_xsd_numeric_base_type(&name) {
            let base_name = name.local_name.clone();
            self.graph.insert(Type::new(name, Kind::Base { base_name }));
            return Ok(());
        }

        let position = self
            .find_global_type(&name)
            .ok_or_else(|| XsdError::UnknownType(name.clone()))?;
        self.process_type_element(position, name)
    }

    fn process_type_element(&mut self, position: Position<'a>, type_name: QName) -> Result<()> {
        if is_xsd_tag(position.node, "simpleType") {
            return self.process_simple_type(position, type_name);
        }
        if is_xsd_tag(position.node, "complexType") {
            return self.process_complex_type(position, type_name);
        }
        if is_xsd_tag(position.node, "element") {
            if let Some(complex_type) = find_xsd_child(position.node, "complexType") {
                return self.process_type_element(
                    Position {
                        node: complex_type,
                        file_index: position.file_index,
                    },
                    type_name,
                );
            }
            let type_attr = position.node.attribute("type").ok_or_else(|| XsdError::MissingConstruct {
                expected: "'complexType'".into(),
                context: position.node.tag_name().name().to_string(),
            })?;
            let base_type = self.resolve_qname_attr(position.file_index, type_attr)?;
            self.process_type(base_type.clone())?;
            self.graph.insert(Type::new(
                type_name,
                Kind::Element {
                    base_type: Some(base_type),
                    attributes: Vec::new(),
                    elements: Vec::new(),
                    flags: ElementFlags::default(),
                },
            ));
            return Ok(());
        }
        Err(XsdError::UnsupportedElementType(position.node.tag_name().name().to_string()))
    }

    fn process_simple_type(&mut self, position: Position<'a>, type_name: QName) -> Result<()> {
        if let Some(restriction) = find_xsd_child(position.node, "restriction") {
            let base_attr = restriction.attribute("base").unwrap_or_default();
            let base = self.resolve_qname_attr(position.file_index, base_attr)?;

            if is_xsd_local(&base, "normalizedString") || is_xsd_local(&base, "string") {
                let enum_values: Vec<String> = restriction
                    .children()
                    .filter(|n| n.is_element() && is_xsd_tag(*n, "enumeration"))
                    .map(|n| n.attribute("value").unwrap_or_default().to_string())
                    .collect();

                let kind = if enum_values.is_empty() {
                    Kind::String
                } else {
                    Kind::Enum { enum_values }
                };
                self.graph.insert(Type::new(type_name, kind));
                return Ok(());
            }

            self.graph
                .insert(Type::new(type_name, Kind::SimpleRef { base_type: base.clone() }));
            return self.process_type(base);
        }

        if let Some(union) = find_xsd_child(position.node, "union") {
            let member_types_attr = union.attribute("memberTypes").unwrap_or_default();
            let member_types = member_types_attr
                .split_whitespace()
                .map(|raw| self.resolve_qname_attr(position.file_index, raw))
                .collect::<Result<Vec<_>>>()?;
            self.graph
                .insert(Type::new(type_name, Kind::Union { member_types: member_types.clone() }));
            for member in member_types {
                self.process_type(member)?;
            }
            return Ok(());
        }

        if let Some(list) = find_xsd_child(position.node, "list") {
            let item_type = match list.attribute("itemType") {
                Some(raw) => self.resolve_qname_attr(position.file_index, raw)?,
                None => {
                    if let Some(inline_simple) = find_xsd_child(list, "simpleType") {
                        let item_type = type_name.with_suffix("_item_t");
                        self.process_type_element(
                            Position {
                                node: inline_simple,
                                file_index: position.file_index,
                            },
                            item_type.clone(),
                        )?;
                        item_type
                    } else {
                        QName::new(XSD_NAMESPACE, "anySimpleType")
                    }
                }
            };
            self.graph
                .insert(Type::new(type_name, Kind::List { item_type: item_type.clone() }));
            return self.process_type(item_type);
        }

        Err(XsdError::MissingConstruct {
            expected: "'restriction', 'union', or 'list'".into(),
            context: type_name.to_string(),
        })
    }

    fn process_complex_type(&mut self, position: Position<'a>, type_name: QName) -> Result<()> {
        // Stub inserted up front so a recursive self-reference (§9) sees
        // the type as already present; fields are swapped in at the end.
        self.graph.insert(Type::new(
            type_name.clone(),
            Kind::Element {
                base_type: None,
                attributes: Vec::new(),
                elements: Vec::new(),
                flags: ElementFlags::default(),
            },
        ));

        let mut attributes = Vec::new();
        let mut elements = Vec::new();
        let mut flags = ElementFlags::default();
        let mut base_type = None;

        if position.node.attribute("mixed") == Some("true") {
            base_type = Some(QName::new(XSD_NAMESPACE, "string"));
        }

        for child in position.node.children().filter(|n| n.is_element()) {
            self.process_complex_type_member(child, position.file_index, &type_name, &mut attributes, &mut elements, &mut flags, &mut base_type)?;
        }

        if let Some(bt) = &base_type {
            if is_xsd_local(bt, "string") {
                flags.read_text = true;
            }
        }

        self.graph.insert(Type::new(
            type_name,
            Kind::Element {
                base_type,
                attributes,
                elements,
                flags,
            },
        ));
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn process_complex_type_member(
        &mut self,
        child: Node<'a, 'a>,
        file_index: usize,
        type_name: &QName,
        attributes: &mut Vec<AttributeDescriptor>,
        elements: &mut Vec<ElementRef>,
        flags: &mut ElementFlags,
        base_type: &mut Option<QName>,
    ) -> Result<()> {
        let position = Position { node: child, file_index };
        let local = child.tag_name().name();
        match local {
            "attribute" if is_xsd_tag(child, "attribute") => {
                attributes.push(self.process_xs_attribute(position)?);
            }
            "all" | "sequence" if is_xsd_tag(child, local) => {
                self.process_xs_all_et_al(position, type_name, elements, flags)?;
            }
            "choice" if is_xsd_tag(child, "choice") => {
                self.process_choice(position, type_name, child, elements)?;
            }
            "complexContent" | "simpleContent" if is_xsd_tag(child, local) => {
                for grandchild in child.children().filter(|n| n.is_element()) {
                    let is_extension = is_xsd_tag(grandchild, "extension");
                    let is_restriction = is_xsd_tag(grandchild, "restriction");
                    if !is_extension && !is_restriction {
                        continue;
                    }
                    let base_attr = grandchild.attribute("base").unwrap_or_default();
                    let base = self.resolve_qname_attr(file_index, base_attr)?;
                    self.process_type(base.clone())?;
                    *base_type = Some(base);

                    if is_restriction {
                        // §9: restriction members are not walked (documented gap).
                        continue;
                    }

                    for member in grandchild.children().filter(|n| n.is_element()) {
                        let member_position = Position { node: member, file_index };
                        let member_local = member.tag_name().name();
                        match member_local {
                            "attribute" if is_xsd_tag(member, "attribute") => {
                                attributes.push(self.process_xs_attribute(member_position)?);
                            }
                            "all" | "sequence" if is_xsd_tag(member, member_local) => {
                                self.process_xs_all_et_al(member_position, type_name, elements, flags)?;
                            }
                            "choice" if is_xsd_tag(member, "choice") => {
                                self.process_choice(member_position, type_name, member, elements)?;
                            }
                            _ => log::trace!("skipped {member_local} inside extension of {type_name}"),
                        }
                    }
                }
            }
            "annotation" if is_xsd_tag(child, "annotation") => {}
            "anyAttribute" if is_xsd_tag(child, "anyAttribute") => {
                flags.any_attribute = true;
            }
            _ => log::trace!("skipped {local} inside complexType {type_name}"),
        }
        Ok(())
    }

    fn process_choice(
        &mut self,
        position: Position<'a>,
        parent_type_name: &QName,
        choice_node: Node<'a, 'a>,
        elements_out: &mut Vec<ElementRef>,
    ) -> Result<()> {
        let mut choice_elements = Vec::new();
        let mut unused_flags = ElementFlags::default();
        self.process_xs_all_et_al(position, parent_type_name, &mut choice_elements, &mut unused_flags)?;

        if choice_elements.is_empty() {
            return Ok(());
        }

        let max_occurs = parse_occurs(choice_node.attribute("maxOccurs"), 1);
        for mut element_ref in choice_elements {
            element_ref.min_occurs = 0;
            element_ref.max_occurs = max_occurs;
            elements_out.push(element_ref);
        }
        Ok(())
    }

    /// §4.2.5: walks `xs:all`/`xs:sequence`/`xs:choice`/`xs:any` children.
    fn process_xs_all_et_al(
        &mut self,
        position: Position<'a>,
        parent_type_name: &QName,
        elements_out: &mut Vec<ElementRef>,
        flags_out: &mut ElementFlags,
    ) -> Result<()> {
        for child in position.node.children().filter(|n| n.is_element()) {
            let child_position = Position {
                node: child,
                file_index: position.file_index,
            };
            if is_xsd_tag(child, "element") {
                let mut element_ref = blank_element_ref();
                self.process_xs_element(child_position, parent_type_name, &mut element_ref, false)?;
                if element_ref.name.local_name.is_empty() || element_ref.type_name.local_name.is_empty() {
                    continue;
                }
                elements_out.push(element_ref);
            } else if is_xsd_tag(child, "choice") {
                let mut choice_elements = Vec::new();
                let mut unused_flags = ElementFlags::default();
                self.process_xs_all_et_al(child_position, parent_type_name, &mut choice_elements, &mut unused_flags)?;
                if !choice_elements.is_empty() {
                    let max_occurs = parse_occurs(child.attribute("maxOccurs"), parse_occurs(position.node.attribute("maxOccurs"), 1));
                    for mut element_ref in choice_elements {
                        element_ref.min_occurs = 0;
                        element_ref.max_occurs = max_occurs;
                        elements_out.push(element_ref);
                    }
                }
            } else if is_xsd_tag(child, "sequence") {
                self.process_xs_all_et_al(child_position, parent_type_name, elements_out, flags_out)?;
            } else if is_xsd_tag(child, "any") {
                let process_contents = child.attribute("processContents").unwrap_or_default();
                if process_contents == "skip" || process_contents == "lax" {
                    flags_out.skip_process_contents = true;
                }
            } else {
                log::trace!("skipped {} inside all/sequence/choice of {parent_type_name}", child.tag_name().name());
            }
        }
        Ok(())
    }

    /// §4.2.5: processes a single `xs:element` use site.
    fn process_xs_element(
        &mut self,
        position: Position<'a>,
        parent_type_name: &QName,
        element_ref: &mut ElementRef,
        at_root: bool,
    ) -> Result<()> {
        if let Some(ref_raw) = position.node.attribute("ref") {
            if at_root {
                return Ok(());
            }
            let ref_name = self.resolve_qname_attr(position.file_index, ref_raw)?;
            let ref_position = self
                .find_global_ref(&ref_name, "element")
                .ok_or_else(|| XsdError::UnknownRef(ref_name.clone()))?;
            self.process_xs_element(ref_position, &QName::local(""), element_ref, false)?;
            element_ref.min_occurs = parse_occurs(position.node.attribute("minOccurs"), 1);
            element_ref.max_occurs = parse_occurs(position.node.attribute("maxOccurs"), 1);
            element_ref.ref_name = Some(ref_name);
            return Ok(());
        }

        if let Some(type_raw) = position.node.attribute("type") {
            let referenced_type = self.resolve_qname_attr(position.file_index, type_raw)?;
            self.process_type(referenced_type.clone())?;

            let file_namespace = self.forest.files[position.file_index].target_namespace.clone();
            let name_attr = position.node.attribute("name").unwrap_or_default();

            if is_xsd_string_base_type(&referenced_type) {
                let synthetic_name = QName::new(file_namespace.clone(), format!("{}_{}_t", parent_type_name.local_name, name_attr));
                self.graph.insert(Type::new(
                    synthetic_name.clone(),
                    Kind::Element {
                        base_type: Some(QName::new(XSD_NAMESPACE, "string")),
                        attributes: Vec::new(),
                        elements: Vec::new(),
                        flags: ElementFlags { read_text: true, ..Default::default() },
                    },
                ));
                element_ref.type_name = synthetic_name;
            } else {
                element_ref.type_name = referenced_type;
            }

            element_ref.name = QName::new(file_namespace, name_attr);
            element_ref.min_occurs = parse_occurs(position.node.attribute("minOccurs"), 1);
            element_ref.max_occurs = parse_occurs(position.node.attribute("maxOccurs"), 1);

            if let Some(sg_raw) = position.node.attribute("substitutionGroup") {
                let head = self.resolve_qname_attr(position.file_index, sg_raw)?;
                self.register_substitution_group_member(head, element_ref);
            }

            return Ok(());
        }

        if let Some(name_attr) = position.node.attribute("name") {
            if !name_attr.is_empty() {
                let file_namespace = self.forest.files[position.file_index].target_namespace.clone();
                let synthetic_name = QName::new(file_namespace.clone(), format!("{}_{}_t", parent_type_name.local_name, name_attr));
                for child in position.node.children().filter(|n| n.is_element()) {
                    if is_xsd_tag(child, "element") || is_xsd_tag(child, "complexType") || is_xsd_tag(child, "simpleType") {
                        self.process_type_element(
                            Position {
                                node: child,
                                file_index: position.file_index,
                            },
                            synthetic_name.clone(),
                        )?;
                        element_ref.type_name = synthetic_name;
                        element_ref.name = QName::new(file_namespace, name_attr);
                        element_ref.min_occurs = parse_occurs(position.node.attribute("minOccurs"), 1);
                        element_ref.max_occurs = parse_occurs(position.node.attribute("maxOccurs"), 1);
                        return Ok(());
                    }
                }
                return Err(XsdError::MissingConstruct {
                    expected: "'element', 'complexType' or 'simpleType'".into(),
                    context: position.node.tag_name().name().to_string(),
                });
            }
        }

        if at_root {
            return Ok(());
        }

        Err(XsdError::MissingNameSource(position.node.tag_name().name().to_string()))
    }

    fn register_substitution_group_member(&mut self, head: QName, element_ref: &ElementRef) {
        let group_name = head.with_suffix("_group_t");
        let already_member = match self.graph.get(&group_name) {
            Some(Type {
                kind: Kind::SubstitutionGroup { elements },
                ..
            }) => elements.iter().any(|e| e.name == element_ref.name),
            _ => false,
        };
        if already_member {
            return;
        }
        let member = ElementRef {
            name: element_ref.name.clone(),
            type_name: element_ref.type_name.clone(),
            min_occurs: 0,
            max_occurs: 1,
            ref_name: None,
        };
        match self.graph.get_mut(&group_name) {
            Some(ty) => match &mut ty.kind {
                Kind::SubstitutionGroup { elements } => elements.push(member),
                _ => ty.kind = Kind::SubstitutionGroup { elements: vec![member] },
            },
            None => self
                .graph
                .insert(Type::new(group_name, Kind::SubstitutionGroup { elements: vec![member] })),
        }
    }

    fn process_xs_attribute(&mut self, position: Position<'a>) -> Result<AttributeDescriptor> {
        if let Some(ref_raw) = position.node.attribute("ref") {
            let ref_name = self.resolve_qname_attr(position.file_index, ref_raw)?;

            if ref_name.is_xml() && ref_name.local_name == "lang" {
                self.process_type(ref_name.clone())?;
                let file_namespace = self.forest.files[position.file_index].target_namespace.clone();
                return Ok(AttributeDescriptor {
                    name: QName::new(file_namespace, "lang"),
                    type_name: ref_name,
                    is_mandatory: false,
                    default_value: None,
                });
            }

            let ref_position = self
                .find_global_ref(&ref_name, "attribute")
                .ok_or_else(|| XsdError::UnknownAttribute(ref_name.clone()))?;
            return self.process_xs_attribute(ref_position);
        }

        if let Some(type_raw) = position.node.attribute("type") {
            let type_name = self.resolve_qname_attr(position.file_index, type_raw)?;
            self.process_type(type_name.clone())?;
            let file_namespace = self.forest.files[position.file_index].target_namespace.clone();
            return Ok(AttributeDescriptor {
                name: QName::new(file_namespace, position.node.attribute("name").unwrap_or_default()),
                type_name,
                is_mandatory: position.node.attribute("use") == Some("required"),
                default_value: position.node.attribute("default").map(|s| s.to_string()),
            });
        }

        if let Some(name_attr) = position.node.attribute("name") {
            if !name_attr.is_empty() {
                let file_namespace = self.forest.files[position.file_index].target_namespace.clone();
                let type_name = QName::new(file_namespace.clone(), format!("{name_attr}_t"));
                let is_mandatory = position.node.attribute("use") == Some("required");
                let default_value = position.node.attribute("default").map(|s| s.to_string());

                for child in position.node.children().filter(|n| n.is_element()) {
                    if is_xsd_tag(child, "complexType") || is_xsd_tag(child, "simpleType") {
                        self.process_type_element(
                            Position {
                                node: child,
                                file_index: position.file_index,
                            },
                            type_name.clone(),
                        )?;
                        return Ok(AttributeDescriptor {
                            name: QName::new(file_namespace, name_attr),
                            type_name,
                            is_mandatory,
                            default_value,
                        });
                    }
                }
                return Err(XsdError::MissingConstruct {
                    expected: "'complexType' or 'simpleType'".into(),
                    context: position.node.tag_name().name().to_string(),
                });
            }
        }

        Err(XsdError::MissingNameSource(position.node.tag_name().name().to_string()))
    }

    // -- name resolution (§4.2.2) ---------------------------------------

    fn resolve_qname_attr(&self, file_index: usize, raw: &str) -> Result<QName> {
        let file = &self.forest.files[file_index];
        match raw.split_once(':') {
            Some((prefix, local)) => {
                let namespace = file
                    .prefix_to_namespace
                    .get(prefix)
                    .ok_or_else(|| XsdError::UnresolvedPrefix(prefix.to_string()))?;
                Ok(QName::new(namespace.clone(), local))
            }
            None => {
                let namespace = file.prefix_to_namespace.get("").cloned().unwrap_or_default();
                Ok(QName::new(namespace, raw))
            }
        }
    }

    fn find_global_type(&self, name: &QName) -> Option<Position<'a>> {
        self.find_global_named(name, |tag| tag != "element")
    }

    fn find_global_ref(&self, name: &QName, expected_local: &'static str) -> Option<Position<'a>> {
        self.find_global_named(name, move |tag| tag == expected_local)
    }

    fn find_global_named(&self, name: &QName, tag_matches: impl Fn(&str) -> bool) -> Option<Position<'a>> {
        for (file_index, file) in self.forest.files.iter().enumerate() {
            if file.target_namespace != name.namespace {
                continue;
            }
            let root = self.docs[file_index].root_element();
            for child in root.children().filter(|n| n.is_element()) {
                if child.attribute("name") == Some(name.local_name.as_str())
                    && is_xsd_tag(child, "")
                    && tag_matches(child.tag_name().name())
                {
                    return Some(Position { node: child, file_index });
                }
            }
        }
        None
    }
}

fn blank_element_ref() -> ElementRef {
    ElementRef {
        name: QName::local(""),
        type_name: QName::local(""),
        min_occurs: 1,
        max_occurs: 1,
        ref_name: None,
    }
}

fn is_xsd_tag(node: Node, local_name: &str) -> bool {
    node.tag_name().namespace() == Some(XSD_NAMESPACE) && (local_name.is_empty() || node.tag_name().name() == local_name)
}

fn is_xsd_local(name: &QName, local_name: &str) -> bool {
    name.namespace == XSD_NAMESPACE && name.local_name == local_name
}

fn find_xsd_child<'a>(node: Node<'a, 'a>, local_name: &str) -> Option<Node<'a, 'a>> {
    node.children().filter(|n| n.is_element()).find(|n| is_xsd_tag(*n, local_name))
}

/// Parses `minOccurs`/`maxOccurs`. `"unbounded"` and any unparsable value
/// become `0` (spec.md §3.4's "unbounded" sentinel) — matching
/// `original_source`'s `String::toUInt()`, which silently yields `0` on
/// a non-numeric string such as literal `"unbounded"`.
fn parse_occurs(attr: Option<&str>, default: u32) -> u32 {
    match attr {
        None => default,
        Some("unbounded") => 0,
        Some(s) => s.parse().unwrap_or(0),
    }
}
