//! # braille-core
//!
//! Shared library for the Braille host containing the cell model, the
//! translation table loader, the text ⇄ cell codec, and the per-vendor
//! display driver codecs.
//!
//! It has zero dependencies on OS APIs, network sockets, or async runtimes.
//! Physical I/O is reached only through the [`driver::OutputWriter`] seam.
//!
//! # Architecture overview (for beginners)
//!
//! A refreshable Braille display shows a row of *cells*.  Each cell has 6 or
//! 8 pins ("dots") that can be raised or lowered.  Displays also have keys:
//! Braille keyboard keys, navigation buttons, and one *routing* button above
//! every cell.
//!
//! This crate defines:
//!
//! - **`domain`** – Plain value types: [`BrailleCell`], [`CellMatrix`],
//!   [`DeviceInfo`], and [`BrailleEvent`].
//!
//! - **`table`** – Named translation tables (`ueb_grade1`, `ueb_grade2`, …)
//!   mapping text tokens to dot patterns, loaded from YAML documents.
//!
//! - **`translate`** – The codec that turns text into a [`CellMatrix`] using
//!   greedy longest-token matching, and back again.
//!
//! - **`driver`** – The vendor protocol layer: raw input reports become
//!   [`BrailleEvent`]s and cell matrices become vendor output frames.

pub mod domain;
pub mod driver;
pub mod table;
pub mod translate;

// Re-export the most-used types at the crate root so callers can write
// `braille_core::CellMatrix` instead of `braille_core::domain::cell::CellMatrix`.
pub use domain::cell::{BrailleCell, CellError, CellMatrix, DotWidth, MatrixPayload};
pub use domain::device::{DeviceInfo, Transport};
pub use domain::event::{BrailleEvent, EventKind};
pub use driver::{Driver, DriverKind, OutputWriter, WriteError, WriteMode};
pub use table::{TableDefinition, TableError, TableLoader, TranslationTable};
pub use translate::{cells_to_text, text_to_cells, BackendError, TranslationBackend, Translator};
