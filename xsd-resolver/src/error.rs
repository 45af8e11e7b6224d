use crate::qname::QName;

/// Schema-load and schema-resolve error kinds (§7). Each variant is
/// surfaced once, at the site of detection, and propagated immediately —
/// the loader and resolver never attempt local recovery.
#[derive(Debug, thiserror::Error)]
pub enum XsdError {
    #[error("could not read '{path}': {source}")]
    FileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is not well-formed XML: {source}")]
    XmlParseFailed {
        path: String,
        #[source]
        source: roxmltree::Error,
    },

    #[error("could not resolve include/import location '{location}' from '{from}'")]
    UnresolvedLocation { location: String, from: String },

    #[error("failed to resolve namespace prefix '{0}'")]
    UnresolvedPrefix(String),

    #[error("could not find type '{0}'")]
    UnknownType(QName),

    #[error("could not find ref '{0}'")]
    UnknownRef(QName),

    #[error("could not find attribute '{0}'")]
    UnknownAttribute(QName),

    #[error("xs:restriction base '{0}' is not supported")]
    UnsupportedRestrictionBase(QName),

    #[error("could not find '{expected}' in '{context}'")]
    MissingConstruct { expected: String, context: String },

    #[error("missing 'ref', 'type', or 'name' attribute on '{0}'")]
    MissingNameSource(String),

    #[error("element type '{0}' is not supported at this position")]
    UnsupportedElementType(String),

    #[error("root element not found")]
    RootElementNotFound,
}

pub type Result<T> = std::result::Result<T, XsdError>;
