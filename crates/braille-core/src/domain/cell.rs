//! Braille cells and cell matrices.
//!
//! # Dot numbering (for beginners)
//!
//! A Braille cell is a grid of pins.  Six-dot cells have two columns of three
//! pins; eight-dot cells add a fourth row.  The pins are numbered like this:
//!
//! ```text
//!   1 ● ● 4
//!   2 ● ● 5
//!   3 ● ● 6
//!   7 ● ● 8     (eight-dot cells only)
//! ```
//!
//! Dot numbers are **1-based** everywhere outside this module: callers pass
//! lists like `[1, 2, 4]`.  Internally a cell is a bit mask where bit *i* is
//! set when dot *i + 1* is raised, so dot 1 is `0b0000_0001` and dot 8 is
//! `0b1000_0000`.  This is the same bit layout vendor frames and the Unicode
//! Braille Patterns block (U+2800–U+28FF) use, so no remapping is needed at
//! either boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First code point of the Unicode Braille Patterns block (blank cell).
const UNICODE_BRAILLE_BASE: u32 = 0x2800;

/// Errors raised when constructing cells or matrices from invalid input.
///
/// These are the only hard failures in the translation pipeline: they signal a
/// caller programming error rather than malformed device or user input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CellError {
    /// A cell width other than 6 or 8 was requested.
    #[error("unsupported dot width: {0} (expected 6 or 8)")]
    UnsupportedWidth(usize),

    /// A 1-based dot number was zero or larger than the cell width.
    #[error("dot {dot} is outside 1..={width}")]
    DotOutOfRange { dot: u8, width: u8 },

    /// A raw mask raised dots that do not exist at this width.
    #[error("mask 0x{mask:02X} raises dots beyond a {width}-dot cell")]
    MaskOutOfRange { mask: u8, width: u8 },

    /// Cells of different widths were mixed inside one matrix.
    #[error("cell {index} has {found} dots, expected {expected}")]
    MixedWidth { index: usize, expected: u8, found: u8 },

    /// The cursor does not point at a cell of the matrix.
    #[error("cursor {cursor} is outside a matrix of {columns} cells")]
    CursorOutOfRange { cursor: usize, columns: usize },

    /// A payload declared a column count that disagrees with its cell list.
    #[error("payload declares {declared} columns but carries {actual} cells")]
    ColumnMismatch { declared: usize, actual: usize },
}

// ── Dot width ─────────────────────────────────────────────────────────────────

/// Number of dots per cell.  Only six- and eight-dot cells exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DotWidth {
    /// Literary Braille: dots 1–6.
    #[default]
    Six,
    /// Computer Braille: dots 1–8.
    Eight,
}

impl DotWidth {
    /// Number of dots in a cell of this width.
    pub fn count(self) -> u8 {
        match self {
            DotWidth::Six => 6,
            DotWidth::Eight => 8,
        }
    }

    /// Mask with every dot of this width raised.
    pub fn full_mask(self) -> u8 {
        match self {
            DotWidth::Six => 0b0011_1111,
            DotWidth::Eight => 0b1111_1111,
        }
    }
}

impl TryFrom<u8> for DotWidth {
    type Error = CellError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            6 => Ok(DotWidth::Six),
            8 => Ok(DotWidth::Eight),
            other => Err(CellError::UnsupportedWidth(other as usize)),
        }
    }
}

impl From<DotWidth> for u8 {
    fn from(width: DotWidth) -> Self {
        width.count()
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

/// One Braille character position.
///
/// Serializes as its sorted list of raised 1-based dot numbers, e.g. `[1, 3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "Vec<u8>")]
pub struct BrailleCell {
    mask: u8,
    width: DotWidth,
}

impl BrailleCell {
    /// Creates a cell with no dots raised.
    pub fn empty(width: DotWidth) -> Self {
        Self { mask: 0, width }
    }

    /// Creates a cell from a raw bit mask (bit *i* ⇔ dot *i + 1*).
    ///
    /// # Errors
    ///
    /// Returns [`CellError::MaskOutOfRange`] if a six-dot cell would raise
    /// dot 7 or 8.
    pub fn from_mask(width: DotWidth, mask: u8) -> Result<Self, CellError> {
        if mask & !width.full_mask() != 0 {
            return Err(CellError::MaskOutOfRange {
                mask,
                width: width.count(),
            });
        }
        Ok(Self { mask, width })
    }

    /// Creates a cell from 1-based dot numbers.  Duplicates are ignored and
    /// order does not matter.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::DotOutOfRange`] for a dot of 0 or beyond the width.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use braille_core::{BrailleCell, DotWidth};
    ///
    /// let cell = BrailleCell::from_dot_numbers(DotWidth::Six, &[4, 1, 4]).unwrap();
    /// assert_eq!(cell.dot_numbers(), vec![1, 4]);
    /// assert_eq!(cell.mask(), 0b0000_1001);
    /// ```
    pub fn from_dot_numbers(width: DotWidth, dots: &[u8]) -> Result<Self, CellError> {
        let mut mask = 0u8;
        for &dot in dots {
            if dot == 0 || dot > width.count() {
                return Err(CellError::DotOutOfRange {
                    dot,
                    width: width.count(),
                });
            }
            mask |= 1 << (dot - 1);
        }
        Ok(Self { mask, width })
    }

    /// Creates a cell from one boolean per dot; the slice length selects the width.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::UnsupportedWidth`] unless the slice has 6 or 8 entries.
    pub fn from_flags(flags: &[bool]) -> Result<Self, CellError> {
        let width = match flags.len() {
            6 => DotWidth::Six,
            8 => DotWidth::Eight,
            other => return Err(CellError::UnsupportedWidth(other)),
        };
        let mask = flags
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, raised)| if *raised { acc | (1u8 << i) } else { acc });
        Ok(Self { mask, width })
    }

    /// The raw dot mask (bit *i* ⇔ dot *i + 1*).
    pub fn mask(&self) -> u8 {
        self.mask
    }

    pub fn width(&self) -> DotWidth {
        self.width
    }

    /// Returns `true` if the 1-based `dot` is raised.  Out-of-range dots are never raised.
    pub fn is_raised(&self, dot: u8) -> bool {
        dot >= 1 && dot <= self.width.count() && self.mask & (1 << (dot - 1)) != 0
    }

    /// Returns `true` when no dot is raised.
    pub fn is_blank(&self) -> bool {
        self.mask == 0
    }

    /// One flag per dot, index 0 = dot 1.
    pub fn flags(&self) -> Vec<bool> {
        (0..self.width.count())
            .map(|i| self.mask & (1 << i) != 0)
            .collect()
    }

    /// Sorted list of raised 1-based dot numbers.
    pub fn dot_numbers(&self) -> Vec<u8> {
        (1..=self.width.count())
            .filter(|&dot| self.is_raised(dot))
            .collect()
    }

    /// Renders the cell as a Unicode Braille Patterns character.
    pub fn to_unicode(&self) -> char {
        char::from_u32(UNICODE_BRAILLE_BASE + u32::from(self.mask)).unwrap_or('\u{2800}')
    }
}

impl From<BrailleCell> for Vec<u8> {
    fn from(cell: BrailleCell) -> Self {
        cell.dot_numbers()
    }
}

// ── Matrix ────────────────────────────────────────────────────────────────────

/// A rectangular block of cells plus optional cursor metadata.
///
/// Invariants (enforced by [`CellMatrix::new`]):
/// - every cell has the same [`DotWidth`];
/// - `columns() == cells().len()`;
/// - the cursor, when present, indexes an existing cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMatrix {
    rows: usize,
    cells: Vec<BrailleCell>,
    cursor: Option<usize>,
}

impl CellMatrix {
    /// Builds a single-row matrix.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::MixedWidth`] if the cells disagree on width, or
    /// [`CellError::CursorOutOfRange`] if `cursor` does not index a cell.
    pub fn new(cells: Vec<BrailleCell>, cursor: Option<usize>) -> Result<Self, CellError> {
        if let Some(first) = cells.first() {
            let expected = first.width();
            if let Some((index, bad)) = cells
                .iter()
                .enumerate()
                .find(|(_, c)| c.width() != expected)
            {
                return Err(CellError::MixedWidth {
                    index,
                    expected: expected.count(),
                    found: bad.width().count(),
                });
            }
        }
        if let Some(cursor) = cursor {
            if cursor >= cells.len() {
                return Err(CellError::CursorOutOfRange {
                    cursor,
                    columns: cells.len(),
                });
            }
        }
        Ok(Self {
            rows: 1,
            cells,
            cursor,
        })
    }

    /// Builds a single-row matrix from cells the caller already knows share
    /// one width, with a cursor inside the row.
    pub(crate) fn single_row(cells: Vec<BrailleCell>, cursor: Option<usize>) -> Self {
        debug_assert!(cursor.map_or(true, |c| c < cells.len()));
        Self {
            rows: 1,
            cells,
            cursor,
        }
    }

    /// A matrix with no cells and no cursor.
    pub fn empty() -> Self {
        Self {
            rows: 1,
            cells: Vec::new(),
            cursor: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[BrailleCell] {
        &self.cells
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Width shared by every cell, or `None` for an empty matrix.
    pub fn width(&self) -> Option<DotWidth> {
        self.cells.first().map(BrailleCell::width)
    }

    /// Compares cell content only, ignoring the cursor.
    pub fn same_cells(&self, other: &CellMatrix) -> bool {
        self.cells == other.cells
    }

    /// Renders all cells as a string of Unicode Braille Patterns.
    pub fn to_unicode(&self) -> String {
        self.cells.iter().map(BrailleCell::to_unicode).collect()
    }

    /// Converts to the interop shape `{table, rows, cols, cells, cursor}`.
    pub fn to_payload(&self, table: &str) -> MatrixPayload {
        MatrixPayload {
            table: table.to_string(),
            rows: self.rows,
            cols: self.columns(),
            cells: self.cells.iter().map(BrailleCell::dot_numbers).collect(),
            cursor: self.cursor,
        }
    }
}

impl Default for CellMatrix {
    fn default() -> Self {
        Self::empty()
    }
}

/// Interop representation of a [`CellMatrix`] exchanged with external callers.
///
/// Cells are lists of 1-based dot numbers; raw bit masks never cross this boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixPayload {
    pub table: String,
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Vec<u8>>,
    pub cursor: Option<usize>,
}

impl MatrixPayload {
    /// Rebuilds a [`CellMatrix`] of the given width.
    ///
    /// # Errors
    ///
    /// Returns [`CellError`] if a dot is out of range, the cursor is outside
    /// the matrix, or `cols` disagrees with the number of cells.
    pub fn to_matrix(&self, width: DotWidth) -> Result<CellMatrix, CellError> {
        if self.cols != self.cells.len() {
            return Err(CellError::ColumnMismatch {
                declared: self.cols,
                actual: self.cells.len(),
            });
        }
        let cells = self
            .cells
            .iter()
            .map(|dots| BrailleCell::from_dot_numbers(width, dots))
            .collect::<Result<Vec<_>, _>>()?;
        CellMatrix::new(cells, self.cursor)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_numbers_are_one_based() {
        // Arrange / Act
        let cell = BrailleCell::from_dot_numbers(DotWidth::Six, &[1]).unwrap();

        // Assert
        assert_eq!(cell.mask(), 0b0000_0001);
        assert!(cell.is_raised(1));
        assert!(!cell.is_raised(0));
        assert_eq!(cell.flags(), vec![true, false, false, false, false, false]);
    }

    #[test]
    fn test_dot_zero_is_rejected() {
        let result = BrailleCell::from_dot_numbers(DotWidth::Six, &[0]);
        assert_eq!(result, Err(CellError::DotOutOfRange { dot: 0, width: 6 }));
    }

    #[test]
    fn test_dot_seven_is_rejected_for_six_dot_cells() {
        let result = BrailleCell::from_dot_numbers(DotWidth::Six, &[1, 7]);
        assert!(matches!(result, Err(CellError::DotOutOfRange { dot: 7, .. })));
    }

    #[test]
    fn test_dot_eight_is_accepted_for_eight_dot_cells() {
        let cell = BrailleCell::from_dot_numbers(DotWidth::Eight, &[8]).unwrap();
        assert_eq!(cell.mask(), 0b1000_0000);
        assert_eq!(cell.flags().len(), 8);
    }

    #[test]
    fn test_from_mask_rejects_bits_beyond_width() {
        let result = BrailleCell::from_mask(DotWidth::Six, 0b0100_0000);
        assert!(matches!(result, Err(CellError::MaskOutOfRange { .. })));
    }

    #[test]
    fn test_from_flags_infers_width_from_length() {
        let six = BrailleCell::from_flags(&[true, true, false, false, false, false]).unwrap();
        let eight = BrailleCell::from_flags(&[false; 8]).unwrap();

        assert_eq!(six.width(), DotWidth::Six);
        assert_eq!(six.dot_numbers(), vec![1, 2]);
        assert_eq!(eight.width(), DotWidth::Eight);
        assert!(eight.is_blank());
    }

    #[test]
    fn test_from_flags_rejects_other_widths() {
        for len in [0usize, 4, 7, 9] {
            let flags = vec![false; len];
            assert_eq!(
                BrailleCell::from_flags(&flags),
                Err(CellError::UnsupportedWidth(len)),
                "width {len} must be rejected"
            );
        }
    }

    #[test]
    fn test_dot_width_try_from_only_accepts_six_and_eight() {
        assert_eq!(DotWidth::try_from(6), Ok(DotWidth::Six));
        assert_eq!(DotWidth::try_from(8), Ok(DotWidth::Eight));
        assert!(DotWidth::try_from(7).is_err());
    }

    #[test]
    fn test_cell_serializes_as_dot_list() {
        let cell = BrailleCell::from_dot_numbers(DotWidth::Six, &[4, 2, 1]).unwrap();
        let json = serde_json::to_string(&cell).unwrap();
        assert_eq!(json, "[1,2,4]");
    }

    #[test]
    fn test_unicode_rendering_uses_braille_block() {
        let blank = BrailleCell::empty(DotWidth::Six);
        let a = BrailleCell::from_dot_numbers(DotWidth::Six, &[1]).unwrap();
        let full = BrailleCell::from_mask(DotWidth::Eight, 0xFF).unwrap();

        assert_eq!(blank.to_unicode(), '⠀');
        assert_eq!(a.to_unicode(), '⠁');
        assert_eq!(full.to_unicode(), '⣿');
    }

    #[test]
    fn test_matrix_rejects_cursor_outside_cells() {
        let cells = vec![BrailleCell::empty(DotWidth::Six)];
        let result = CellMatrix::new(cells, Some(1));
        assert_eq!(
            result,
            Err(CellError::CursorOutOfRange {
                cursor: 1,
                columns: 1
            })
        );
    }

    #[test]
    fn test_matrix_rejects_mixed_widths() {
        let cells = vec![
            BrailleCell::empty(DotWidth::Six),
            BrailleCell::empty(DotWidth::Eight),
        ];
        let result = CellMatrix::new(cells, None);
        assert!(matches!(result, Err(CellError::MixedWidth { index: 1, .. })));
    }

    #[test]
    fn test_matrix_columns_equal_cell_count() {
        let cells = vec![BrailleCell::empty(DotWidth::Six); 3];
        let matrix = CellMatrix::new(cells, Some(2)).unwrap();
        assert_eq!(matrix.rows(), 1);
        assert_eq!(matrix.columns(), 3);
        assert_eq!(matrix.width(), Some(DotWidth::Six));
    }

    #[test]
    fn test_default_matrix_is_empty_single_row() {
        let matrix = CellMatrix::default();
        assert_eq!(matrix, CellMatrix::empty());
        assert_eq!(matrix.rows(), 1);
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_payload_carries_one_based_dot_lists() {
        // Arrange
        let cells = vec![
            BrailleCell::from_dot_numbers(DotWidth::Six, &[1, 3]).unwrap(),
            BrailleCell::empty(DotWidth::Six),
        ];
        let matrix = CellMatrix::new(cells, Some(1)).unwrap();

        // Act
        let payload = matrix.to_payload("ueb_grade1");

        // Assert
        assert_eq!(payload.cells, vec![vec![1, 3], vec![]]);
        assert_eq!(payload.cols, 2);
        assert_eq!(payload.cursor, Some(1));
        assert_eq!(payload.to_matrix(DotWidth::Six).unwrap(), matrix);
    }

    #[test]
    fn test_payload_with_wrong_column_count_is_rejected() {
        let payload = MatrixPayload {
            table: "t".to_string(),
            rows: 1,
            cols: 3,
            cells: vec![vec![1]],
            cursor: None,
        };
        assert!(matches!(
            payload.to_matrix(DotWidth::Six),
            Err(CellError::ColumnMismatch { declared: 3, actual: 1 })
        ));
    }

    #[test]
    fn test_same_cells_ignores_cursor() {
        let cells = vec![BrailleCell::empty(DotWidth::Six); 2];
        let a = CellMatrix::new(cells.clone(), Some(0)).unwrap();
        let b = CellMatrix::new(cells, None).unwrap();
        assert!(a.same_cells(&b));
        assert_ne!(a, b);
    }
}
