//! Error types for the binder.
//!
//! Only document-level failures (`Document`, `Io`) abort a load call.
//! Every other variant is accumulated: the binder logs the error, sets
//! its error flag and continues with the remaining siblings or fields.

use thiserror::Error;

/// Main error type for the xmlbind library.
#[derive(Debug, Error)]
pub enum BindError {
    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    Document(#[from] roxmltree::Error),

    /// IO error while reading the document source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Registration was attempted with an empty or whitespace tag name.
    #[error("cannot register a binding with a blank tag name")]
    BlankTag,

    /// A tag has no registered binding.
    #[error("no binding registered for <{tag}>")]
    BindingNotFound { tag: String },

    /// The target type has no default constructor.
    #[error("cannot construct {type_name} for <{tag}>: no default constructor")]
    Construction { tag: String, type_name: String },

    /// Element text could not be parsed into the target scalar type.
    #[error("<{tag}>: cannot convert '{text}' to {type_name}: {message}")]
    Conversion {
        tag: String,
        type_name: String,
        text: String,
        message: String,
    },

    /// No field or setter on the aggregate matches a child tag.
    #[error("field named \"{tag}\" in {type_name} is absent, inaccessible, or missing setter")]
    FieldResolution { tag: String, type_name: String },

    /// A field or setter exists but the assignment could not be performed.
    #[error("cannot assign '{member}' on {type_name}: {message}")]
    Access {
        member: String,
        type_name: String,
        message: String,
    },

    /// A collection binding has no recoverable element type.
    #[error("<{tag}>: unable to determine item type")]
    MissingElementType { tag: String },

    /// A map binding has no recoverable key or value types.
    #[error("<{tag}>: unable to determine key or value types")]
    MissingKeyValueTypes { tag: String },

    /// A map entry's tag name could not be converted to the key type.
    #[error("key '{key}' cannot be converted to {type_name}: {message}")]
    KeyConversion {
        key: String,
        type_name: String,
        message: String,
    },
}

/// Result type alias for binder operations.
pub type Result<T> = std::result::Result<T, BindError>;
