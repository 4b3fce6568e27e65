//! Text ⇄ Braille translation.
//!
//! [`text_to_cells`] and [`cells_to_text`] are pure functions over a
//! [`TranslationTable`].  [`Translator`] binds one named table and optionally
//! consults a [`TranslationBackend`] first, falling back to the table codec
//! whenever the backend cannot help.
//!
//! # Round-trip law (for beginners)
//!
//! For any text made only of tokens the table defines and whose greedy
//! segmentation is unambiguous, `cells_to_text(text_to_cells(t))` gives back
//! the lower-cased input.  Anything outside the table is lossy: unknown
//! characters become blank cells on the way in and unknown patterns become
//! `"?"` on the way out.

pub mod backend;
pub mod codec;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::domain::cell::{BrailleCell, CellError, CellMatrix, DotWidth, MatrixPayload};
use crate::table::{TableDefinition, TableLoader, TranslationTable};

pub use backend::{BackendError, TranslationBackend};
pub use codec::{cells_to_text, text_to_cells, UNKNOWN_PLACEHOLDER};

/// Translator bound to one named table.
///
/// Cheap to share: the compiled table and the backend sit behind `Arc`s and
/// the fallback counter is atomic, so `&Translator` can be used from many
/// threads at once.
pub struct Translator {
    table_name: String,
    table: Arc<TranslationTable>,
    backend: Option<Arc<dyn TranslationBackend>>,
    fallbacks: AtomicU64,
}

impl Translator {
    /// Wraps an already-compiled table.
    pub fn new(table_name: impl Into<String>, table: TranslationTable) -> Self {
        Self {
            table_name: table_name.into(),
            table: Arc::new(table),
            backend: None,
            fallbacks: AtomicU64::new(0),
        }
    }

    /// Loads `table_name` through `loader`.  Never fails; a missing or
    /// invalid table gives the built-in default.
    pub fn from_loader(loader: &TableLoader, table_name: &str) -> Self {
        let table = TranslationTable::from_definition(&loader.load(table_name));
        Self::new(table_name, table)
    }

    /// The built-in default table at a requested dot count.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::UnsupportedWidth`] unless `dots` is 6 or 8.
    pub fn builtin(dots: u8) -> Result<Self, CellError> {
        let width = DotWidth::try_from(dots)?;
        let def = TableDefinition::new(width, Vec::<(&str, Vec<u64>)>::new())
            .map_err(|_| CellError::UnsupportedWidth(usize::from(dots)))?;
        Ok(Self::new("builtin", TranslationTable::from_definition(&def)))
    }

    /// Consults `backend` before the table codec.
    pub fn with_backend(mut self, backend: Arc<dyn TranslationBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    pub fn width(&self) -> DotWidth {
        self.table.width()
    }

    /// How many requests fell back from the backend to the table codec.
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Translates text into a single-row matrix.
    pub fn text_to_cells(&self, text: &str) -> CellMatrix {
        if let Some(backend) = self.available_backend() {
            match self.backend_text_to_cells(backend, text) {
                Ok(matrix) => return matrix,
                Err(e) => self.note_fallback("text_to_cells", &e),
            }
        }
        text_to_cells(text, &self.table)
    }

    /// Back-translates a matrix into text.
    pub fn cells_to_text(&self, matrix: &CellMatrix) -> String {
        if let Some(backend) = self.available_backend() {
            let dots: Vec<Vec<u8>> = matrix.cells().iter().map(BrailleCell::dot_numbers).collect();
            match backend.dots_to_text(&dots, &self.table_name) {
                Ok(text) => return text,
                Err(e) => self.note_fallback("cells_to_text", &e),
            }
        }
        cells_to_text(matrix, &self.table)
    }

    /// Translates text straight into the interop payload shape.
    pub fn translate(&self, text: &str) -> MatrixPayload {
        self.text_to_cells(text).to_payload(&self.table_name)
    }

    fn available_backend(&self) -> Option<&dyn TranslationBackend> {
        self.backend
            .as_deref()
            .filter(|backend| backend.is_available())
    }

    fn backend_text_to_cells(
        &self,
        backend: &dyn TranslationBackend,
        text: &str,
    ) -> Result<CellMatrix, BackendError> {
        let width = self.table.width();
        let cells = backend
            .text_to_dots(text, &self.table_name)?
            .iter()
            .map(|dots| BrailleCell::from_dot_numbers(width, dots))
            .collect::<Result<Vec<_>, _>>()?;
        let cursor = cells.len().checked_sub(1);
        Ok(CellMatrix::new(cells, cursor)?)
    }

    fn note_fallback(&self, op: &str, error: &BackendError) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
        debug!(table = %self.table_name, op, error = %error, "backend failed; using table codec");
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("table_name", &self.table_name)
            .field("width", &self.table.width())
            .field("entries", &self.table.len())
            .field("backend", &self.backend.is_some())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
