/// A source line, handed to generated `set_attribute` closures so they
/// can raise a [`crate::error::ParseError::Verification`] that points at
/// the attribute that failed to coerce.
#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub line: u32,
}
