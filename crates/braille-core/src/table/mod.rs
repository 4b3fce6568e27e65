//! Translation tables: named token → dot-pattern mappings.
//!
//! The canonical source format is a YAML document:
//!
//! ```yaml
//! dots: 6
//! mapping:
//!   "a": [1]
//!   "and": [1, 2, 3, 4, 6]
//! ```
//!
//! Documents are validated once into a [`TableDefinition`] and compiled into an
//! immutable [`TranslationTable`] used by the codec.  A table source that
//! cannot be found or fails validation degrades to the built-in default table;
//! the caller never sees an error from [`TableLoader::load`].

pub mod definition;
pub mod loader;
pub mod translation;

use std::path::PathBuf;

use thiserror::Error;

pub use definition::{TableDefinition, TableEntry};
pub use loader::{TableLoader, BUNDLED_TABLES, DEFAULT_TABLE_NAME};
pub use translation::TranslationTable;

/// Errors raised while reading or validating a table document.
#[derive(Debug, Error)]
pub enum TableError {
    /// The document is not valid YAML or does not have the expected shape.
    #[error("failed to parse table document: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// The table file exists but could not be read.
    #[error("I/O error reading table at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table name contains characters other than ASCII letters, digits, `_` or `-`.
    #[error("invalid table name: {0:?}")]
    InvalidName(String),

    /// The `dots` field is neither 6 nor 8.
    #[error("unsupported dot count: {0} (expected 6 or 8)")]
    UnsupportedWidth(u64),

    /// A mapping key is the empty string.
    #[error("table contains an empty token")]
    EmptyToken,

    /// Two mapping keys are equal once case is folded.
    #[error("duplicate token: {0:?}")]
    DuplicateToken(String),

    /// A mapping value is not a list of dot numbers.
    #[error("token {token:?} must map to a list of dot numbers")]
    InvalidDots { token: String },

    /// A dot number lies outside `1..=dots`.
    #[error("token {token:?} uses dot {dot}, outside 1..={width}")]
    DotOutOfRange { token: String, dot: u64, width: u8 },
}
