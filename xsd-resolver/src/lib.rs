//! Flattens XML Schema Definition documents into a canonical, QName-keyed
//! Type Graph (§3, §4.1, §4.2).
//!
//! ```no_run
//! let graph = xsd_resolver::resolve("schema.xsd", &[], false).unwrap();
//! assert!(graph.root_type.is_some());
//! ```

pub mod builtins;
pub mod error;
pub mod graph;
pub mod loader;
pub mod qname;
pub mod resolver;

pub use error::{Result, XsdError};
pub use graph::{AttributeDescriptor, ElementFlags, ElementRef, Kind, Type, TypeGraph};
pub use qname::QName;

use loader::Loader;
use resolver::Resolver;

/// Loads `root_path` and every file it transitively includes/imports,
/// then resolves the whole forest into a single [`TypeGraph`].
///
/// `force_process_types` names local types (in the primary namespace)
/// to resolve even if no reachable element or attribute refers to them —
/// useful for a compiler invocation that wants a type emitted for its
/// own sake. `allow_dtd` is forwarded to every `roxmltree` parse this
/// load performs (§6.3's `--allow-dtd`).
pub fn resolve(root_path: &str, force_process_types: &[String], allow_dtd: bool) -> Result<TypeGraph> {
    let forest = Loader::load(root_path, allow_dtd)?;
    let resolver = Resolver::new(&forest)?;
    resolver.run(force_process_types)
}
