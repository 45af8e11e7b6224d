/// §7/§6.4: the two diagnostic categories a generated parser can raise.
/// Grounded on `original_source/src/XmlParser.cpp`'s
/// `throwSyntaxException`/`throwVerificationException`, which format
/// identically except for the leading word.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error at line '{line}': {message}")]
    Syntax { line: u32, message: String },

    #[error("Error at line '{line}': {message}")]
    Verification { line: u32, message: String },

    /// `load_file`'s own failure mode, not part of spec.md §6.4's two
    /// diagnostic categories (those both presuppose a loaded buffer).
    #[error("could not read '{path}': {source}")]
    FileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ParseError>;
