//! Schema Loader, §4.1. Pulls a root XSD file and every file it
//! transitively `include`s/`import`s into a flat forest of owned XML
//! text, recording each file's target namespace and prefix bindings.
//!
//! Grounded on `original_source/src/Reader.cpp`'s `loadXsdFile` pair
//! (the single-argument entry point for a brand new namespace bucket,
//! and the two-argument recursive walk for includes within one bucket).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, XsdError};
use crate::qname::XML_NAMESPACE;

#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub path: String,
    pub target_namespace: String,
    pub content: String,
    pub prefix_to_namespace: HashMap<String, String>,
    pub namespace_to_prefix: HashMap<String, String>,
}

#[derive(Debug, Default)]
pub struct SchemaForest {
    /// Every loaded file, root first. The primary namespace (§3.5's "the
    /// one of the initially-loaded file") is `files[0].target_namespace`.
    pub files: Vec<LoadedSchema>,
    /// First prefix ever seen for a namespace, process-wide (§4.1 output).
    pub namespace_to_suggested_prefix: HashMap<String, String>,
    /// Whatever `--allow-dtd` was set to for this load, so the resolver's
    /// own re-parse of the same content (see module docs on the
    /// two-phase load/resolve split) uses matching `roxmltree` options —
    /// otherwise a schema only the loader was permitted to accept would
    /// fail again when the resolver re-parses it.
    pub allow_dtd: bool,
}

impl SchemaForest {
    pub fn primary_namespace(&self) -> &str {
        self.files
            .first()
            .map(|f| f.target_namespace.as_str())
            .unwrap_or_default()
    }

    pub fn files_in_namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a LoadedSchema> {
        self.files.iter().filter(move |f| f.target_namespace == namespace)
    }

    pub fn namespace_is_loaded(&self, namespace: &str) -> bool {
        self.files.iter().any(|f| f.target_namespace == namespace)
    }
}

pub struct Loader {
    root_dir: PathBuf,
    forest: SchemaForest,
    parsing_options: roxmltree::ParsingOptions,
}

impl Loader {
    /// Loads `root_path` and everything it transitively includes/imports.
    /// `allow_dtd` mirrors the CLI's `--allow-dtd` flag (§6.3) through to
    /// every `roxmltree` parse of this load, including includes/imports.
    pub fn load(root_path: &str, allow_dtd: bool) -> Result<SchemaForest> {
        let root_dir = Path::new(root_path)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let mut loader = Loader {
            root_dir,
            forest: SchemaForest { allow_dtd, ..SchemaForest::default() },
            parsing_options: roxmltree::ParsingOptions { allow_dtd, ..Default::default() },
        };
        loader.load_root(root_path)?;
        Ok(loader.forest)
    }

    fn read_file(path: &str) -> Result<String> {
        std::fs::read_to_string(path).map_err(|source| XsdError::FileUnreadable {
            path: path.to_string(),
            source,
        })
    }

    fn parse_document<'d>(&self, path: &str, content: &'d str) -> Result<roxmltree::Document<'d>> {
        roxmltree::Document::parse_with_options(content, self.parsing_options).map_err(|source| {
            XsdError::XmlParseFailed {
                path: path.to_string(),
                source,
            }
        })
    }

    /// Loads a brand-new namespace bucket: the root file itself, or the
    /// target of an `xs:import` (which always starts with fresh prefix
    /// maps, never inheriting from the importer).
    fn load_root(&mut self, path: &str) -> Result<()> {
        let content = Self::read_file(path)?;
        let doc = self.parse_document(path, &content)?;
        let root = doc.root_element();
        let target_namespace = root.attribute("targetNamespace").unwrap_or_default().to_string();

        let mut schema = LoadedSchema {
            path: path.to_string(),
            target_namespace,
            content,
            prefix_to_namespace: HashMap::new(),
            namespace_to_prefix: HashMap::new(),
        };
        self.collect_namespace_bindings(root, &mut schema);
        self.forest.files.push(schema);

        self.walk_includes_and_imports(path, self.forest.files.len() - 1)
    }

    /// Loads an `xs:include` target into the same namespace bucket as
    /// `parent_index`, inheriting its prefix maps before applying its own.
    fn load_include(&mut self, path: &str, parent_index: usize) -> Result<()> {
        if self.forest.files.iter().any(|f| f.path == path) {
            return Ok(()); // already included
        }

        let content = Self::read_file(path)?;
        let doc = self.parse_document(path, &content)?;
        let root = doc.root_element();

        let parent = &self.forest.files[parent_index];
        let mut schema = LoadedSchema {
            path: path.to_string(),
            target_namespace: parent.target_namespace.clone(),
            content,
            prefix_to_namespace: parent.prefix_to_namespace.clone(),
            namespace_to_prefix: parent.namespace_to_prefix.clone(),
        };
        self.collect_namespace_bindings(root, &mut schema);
        self.forest.files.push(schema);

        let new_index = self.forest.files.len() - 1;
        self.walk_includes_and_imports(path, new_index)
    }

    fn collect_namespace_bindings(&mut self, root: roxmltree::Node, schema: &mut LoadedSchema) {
        for attr in root.attributes() {
            let (prefix, namespace) = if attr.name() == "xmlns" {
                (String::new(), attr.value().to_string())
            } else if let Some(prefix) = attr.name().strip_prefix("xmlns:") {
                (prefix.to_string(), attr.value().to_string())
            } else {
                continue;
            };
            self.forest
                .namespace_to_suggested_prefix
                .entry(namespace.clone())
                .or_insert_with(|| prefix.clone());
            schema.namespace_to_prefix.insert(namespace.clone(), prefix.clone());
            schema.prefix_to_namespace.insert(prefix, namespace);
        }
    }

    fn walk_includes_and_imports(&mut self, including_path: &str, file_index: usize) -> Result<()> {
        let content = self.forest.files[file_index].content.clone();
        let doc = self.parse_document(including_path, &content)?;
        let root = doc.root_element();

        let including_dir = Path::new(including_path).parent().unwrap_or_else(|| Path::new(""));

        for child in root.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "include" => {
                    let location = child.attribute("schemaLocation").unwrap_or_default();
                    let resolved = resolve_relative(including_dir, location);
                    self.load_include(&resolved, file_index)?;
                }
                "import" => {
                    let namespace = child.attribute("namespace").unwrap_or_default();

                    if namespace == XML_NAMESPACE {
                        let schema = &mut self.forest.files[file_index];
                        schema.prefix_to_namespace.insert("xml".to_string(), namespace.to_string());
                        schema.namespace_to_prefix.insert(namespace.to_string(), "xml".to_string());
                        self.forest
                            .namespace_to_suggested_prefix
                            .entry(namespace.to_string())
                            .or_insert_with(|| "xml".to_string());
                        continue;
                    }

                    if self.forest.namespace_is_loaded(namespace) {
                        continue;
                    }

                    let location = child.attribute("schemaLocation").unwrap_or_default();
                    let resolved = if let Some(basename) = location.strip_prefix("platform:") {
                        resolve_relative(&self.root_dir, Path::new(basename).file_name().map(|s| s.to_string_lossy()).unwrap_or_default().as_ref())
                    } else {
                        resolve_relative(including_dir, location)
                    };
                    self.load_root(&resolved)?;
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn resolve_relative(base_dir: &Path, location: &str) -> String {
    let path = Path::new(location);
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };
    simplify_path(&joined)
}

/// Collapses `.`/`..` segments without touching the filesystem (mirrors
/// `File::simplifyPath` in `original_source/src/Reader.cpp`).
fn simplify_path(path: &Path) -> String {
    let mut out: Vec<std::ffi::OsString> = Vec::new();
    for component in path.components() {
        use std::path::Component::*;
        match component {
            CurDir => {}
            ParentDir => {
                if !matches!(out.last().map(|s| s.to_string_lossy()), Some(ref last) if last == "..") {
                    out.pop();
                } else {
                    out.push(component.as_os_str().to_os_string());
                }
            }
            other => out.push(other.as_os_str().to_os_string()),
        }
    }
    out.into_iter()
        .collect::<PathBuf>()
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplify_path_collapses_parent_segments() {
        let simplified = simplify_path(Path::new("/a/b/../c.xsd"));
        assert_eq!(simplified, "/a/c.xsd");
    }

    #[test]
    fn resolve_relative_joins_with_base_dir() {
        let resolved = resolve_relative(Path::new("/schemas"), "common.xsd");
        assert_eq!(resolved, "/schemas/common.xsd");
    }

    #[test]
    fn resolve_relative_keeps_absolute_paths() {
        let resolved = resolve_relative(Path::new("/schemas"), "/abs/common.xsd");
        assert_eq!(resolved, "/abs/common.xsd");
    }
}
