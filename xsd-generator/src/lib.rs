//! Turns a resolved [`xsd_resolver::graph::TypeGraph`] into generated
//! Rust source. Grounded on `generator/src/generators/mod.rs`'s module
//! split — naming/casing kept separate from the `syn` item-construction
//! pass.

pub mod emit;
pub mod ident;
pub mod naming;

pub use emit::{generate, EmitOptions};
