//! §4.3.1/§6.2: static descriptor tables a generated schema binding
//! builds once and the parser in [`crate::parser`] walks at every
//! element. Grounded on `original_source/src/XmlParser.cpp`'s anonymous
//! `ElementInfo`/`ChildElementInfo`/`AttributeInfo` structs, translated
//! from C++ function-pointer-over-`void*` type erasure to `dyn Any` —
//! the safe-Rust analogue of the same idea, since a single static array
//! has to describe fields of many different concrete generated types.

use std::any::Any;

use crate::error::Result;
use crate::position::Position;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementInfoFlags {
    /// Root-level element: `xmlns`/`xmlns:*` and `xsi:noNamespaceSchemaLocation`
    /// are accepted here even though no [`AttributeInfo`] lists them.
    pub level1: bool,
    /// Character data between tags is captured via `text_field`.
    pub read_text: bool,
    /// Descendants are opaque; their markup is skipped verbatim.
    pub skip_processing: bool,
    /// Unknown attributes are forwarded to `any_attribute_sink` instead
    /// of being rejected.
    pub any_attribute: bool,
}

/// One child element slot. `max_occurs == 0` means unbounded, matching
/// the convention `xsd_resolver::graph::ElementRef` already uses.
pub struct ChildElementInfo {
    pub name: &'static str,
    pub get_field: fn(&mut dyn Any) -> &mut dyn Any,
    pub info: &'static ElementInfo,
    pub min_occurs: usize,
    pub max_occurs: usize,
}

/// One attribute slot. Attribute presence is tracked with a bit in a
/// 64-bit mask (§4.3.1's "at most 64 attributes per type" limit), in
/// the order attributes appear across `attributes` then `base.attributes`.
pub struct AttributeInfo {
    pub name: &'static str,
    pub set_attribute: fn(&mut dyn Any, Position, String) -> Result<()>,
    pub is_mandatory: bool,
    pub set_default_value: Option<fn(&mut dyn Any)>,
}

pub struct ElementInfo {
    pub flags: ElementInfoFlags,
    pub children: &'static [ChildElementInfo],
    pub mandatory_children_count: usize,
    pub attributes: &'static [AttributeInfo],
    /// Field accessor used when `flags.read_text` is set. `None` is only
    /// valid when `read_text` is also unset.
    pub text_field: Option<fn(&mut dyn Any) -> &mut String>,
    /// Collector invoked with `(name, value)` for attributes unmatched by
    /// `attributes` when the element is declared `xs:anyAttribute`-tolerant
    /// (§6.2's `any_attribute_sink_fn`). `None` when that flag is unset
    /// anywhere along the `base` chain.
    pub any_attribute_sink: Option<fn(&mut dyn Any, String, String)>,
    pub base: Option<&'static ElementInfo>,
}

impl ElementInfo {
    /// Sums attribute counts across `self` and the full `base` chain —
    /// the bit width the presence mask in [`crate::parser`] needs to
    /// check for missing mandatory attributes, including inherited ones.
    pub fn total_attribute_count(&self) -> u32 {
        let mut count = 0u32;
        let mut current = Some(self);
        while let Some(info) = current {
            count += info.attributes.len() as u32;
            current = info.base;
        }
        count
    }
}
