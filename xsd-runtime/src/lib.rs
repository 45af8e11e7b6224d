//! Runtime support for bindings emitted by `xsd-generator` (§4.3, §6.2).
//!
//! A generated module owns the record/enum types and builds one
//! `&'static` [`tables::ElementInfo`] tree describing them; this crate
//! supplies the streaming parser that walks that tree against an XML
//! document in a single forward pass, plus the scalar coercers and
//! error types the generated `set_attribute`/text-field closures use.

pub mod error;
pub mod parser;
pub mod position;
pub mod scalars;
pub mod tables;

pub use error::{ParseError, Result};
pub use parser::parse;
pub use position::Position;
pub use tables::{AttributeInfo, ChildElementInfo, ElementInfo, ElementInfoFlags};
