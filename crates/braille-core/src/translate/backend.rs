//! Optional high-fidelity translation engine seam.
//!
//! A backend speaks in 1-based dot lists, the same interop shape as
//! [`crate::MatrixPayload`].  Whenever a backend is missing, unavailable, or
//! fails, the [`super::Translator`] falls back to the table codec; a backend
//! can improve output but never make translation fail.

use thiserror::Error;

use crate::domain::cell::CellError;

/// Errors a translation backend may report.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The engine is not installed or not loaded.
    #[error("translation backend is unavailable")]
    Unavailable,

    /// The engine has no table with this name.
    #[error("translation backend does not know table {0:?}")]
    UnknownTable(String),

    /// The engine ran but reported an error.
    #[error("translation backend failed: {0}")]
    Failed(String),

    /// The engine returned dot lists that do not form valid cells.
    #[error("translation backend returned invalid cells: {0}")]
    InvalidCells(#[from] CellError),
}

/// A pluggable text ⇄ dots engine.
///
/// Implementations must be thread-safe; one backend may serve every
/// translator in the process.
#[cfg_attr(test, mockall::automock)]
pub trait TranslationBackend: Send + Sync {
    /// Whether the engine can currently serve requests.
    fn is_available(&self) -> bool;

    /// Translates `text` with the named table into one dot list per cell.
    fn text_to_dots(&self, text: &str, table: &str) -> Result<Vec<Vec<u8>>, BackendError>;

    /// Back-translates one dot list per cell with the named table.
    fn dots_to_text(&self, cells: &[Vec<u8>], table: &str) -> Result<String, BackendError>;
}
