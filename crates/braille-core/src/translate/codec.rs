//! Table-driven text ⇄ cell codec.
//!
//! Forward direction (`text_to_cells`):
//!
//! ```text
//! "And the"  ──scan left to right──►  longest token matching the case-folded
//!                                     characters here  ──►  one cell per token
//!            ──unmatched character──►  one blank cell
//! ```
//!
//! Reverse direction (`cells_to_text`): each cell's dot pattern is looked up
//! in the table; patterns no token uses become `"?"`.  The reverse mapping is
//! lossy by construction.

use crate::domain::cell::{BrailleCell, CellMatrix};
use crate::table::TranslationTable;

/// Placeholder emitted for a dot pattern no table token uses.
pub const UNKNOWN_PLACEHOLDER: &str = "?";

/// Translates `text` into a single-row cell matrix.
///
/// The cursor is placed on the last cell, or absent for empty input.
///
/// # Examples
///
/// ```rust
/// use braille_core::{text_to_cells, TranslationTable};
///
/// let table = TranslationTable::builtin();
/// let matrix = text_to_cells("Bad", &table);
/// assert_eq!(matrix.columns(), 3);
/// assert_eq!(matrix.cells()[0].dot_numbers(), vec![1, 2]);
/// assert_eq!(matrix.cursor(), Some(2));
/// ```
pub fn text_to_cells(text: &str, table: &TranslationTable) -> CellMatrix {
    let mut rest = text;
    let mut cells = Vec::with_capacity(rest.len());

    while !rest.is_empty() {
        let (consumed, cell) = table.longest_match(rest).unwrap_or_else(|| {
            let literal_len = rest.chars().next().map_or(1, char::len_utf8);
            (literal_len, BrailleCell::empty(table.width()))
        });
        cells.push(cell);
        rest = &rest[consumed..];
    }

    let cursor = cells.len().checked_sub(1);
    CellMatrix::single_row(cells, cursor)
}

/// Translates a cell matrix back into text.
///
/// # Examples
///
/// ```rust
/// use braille_core::{cells_to_text, text_to_cells, TranslationTable};
///
/// let table = TranslationTable::builtin();
/// assert_eq!(cells_to_text(&text_to_cells("CAB", &table), &table), "cab");
/// ```
pub fn cells_to_text(matrix: &CellMatrix, table: &TranslationTable) -> String {
    matrix
        .cells()
        .iter()
        .map(|cell| table.token_for(cell).unwrap_or(UNKNOWN_PLACEHOLDER))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::DotWidth;
    use crate::table::{TableDefinition, TableLoader};

    fn grade2() -> TranslationTable {
        TranslationTable::from_definition(&TableLoader::new().load("ueb_grade2"))
    }

    #[test]
    fn test_empty_text_has_no_cells_and_no_cursor() {
        let matrix = text_to_cells("", &TranslationTable::builtin());
        assert!(matrix.is_empty());
        assert_eq!(matrix.cursor(), None);
        assert_eq!(matrix.rows(), 1);
    }

    #[test]
    fn test_cursor_is_last_cell() {
        let matrix = text_to_cells("abc", &TranslationTable::builtin());
        assert_eq!(matrix.cursor(), Some(2));
    }

    #[test]
    fn test_contraction_collapses_to_one_cell() {
        // Arrange
        let def = TableDefinition::new(
            DotWidth::Six,
            vec![("a", vec![1]), ("and", vec![1, 2, 3, 4, 5])],
        )
        .unwrap();
        let table = TranslationTable::from_definition(&def);

        // Act
        let matrix = text_to_cells("and", &table);

        // Assert
        assert_eq!(matrix.columns(), 1);
        assert_eq!(matrix.cells()[0].dot_numbers(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_unknown_character_is_blank_cell() {
        let matrix = text_to_cells("@", &TranslationTable::builtin());
        assert_eq!(matrix.columns(), 1);
        assert!(matrix.cells()[0].is_blank());
        assert_eq!(matrix.cells()[0].flags(), vec![false; 6]);
    }

    #[test]
    fn test_multibyte_unknown_character_is_one_cell() {
        let matrix = text_to_cells("é☃a", &TranslationTable::builtin());
        assert_eq!(matrix.columns(), 3);
        assert_eq!(matrix.cells()[2].dot_numbers(), vec![1]);
    }

    #[test]
    fn test_character_with_longer_lowercase_is_one_cell() {
        // Arrange: U+0130 lower-cases to two characters.
        let table = TranslationTable::builtin();

        // Act
        let matrix = text_to_cells("\u{130}", &table);
        let mixed = text_to_cells("a\u{130}b", &table);

        // Assert
        assert_eq!(matrix.columns(), 1);
        assert!(matrix.cells()[0].is_blank());
        assert_eq!(mixed.columns(), 3);
        assert_eq!(mixed.cells()[2].dot_numbers(), vec![1, 2]);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let table = TranslationTable::builtin();
        assert_eq!(text_to_cells("ABC", &table), text_to_cells("abc", &table));
    }

    #[test]
    fn test_grade2_mixes_contractions_and_letters() {
        // "the" + " " + "ch" + "a" + "in"
        let matrix = text_to_cells("the chain", &grade2());
        assert_eq!(matrix.columns(), 5);
        assert_eq!(cells_to_text(&matrix, &grade2()), "the chain");
    }

    #[test]
    fn test_cells_to_text_uses_placeholder_for_unknown_pattern() {
        let table = TranslationTable::builtin();
        let cells = vec![
            BrailleCell::from_dot_numbers(DotWidth::Six, &[1]).unwrap(),
            BrailleCell::from_dot_numbers(DotWidth::Six, &[3, 6]).unwrap(),
        ];
        let matrix = CellMatrix::new(cells, None).unwrap();
        assert_eq!(cells_to_text(&matrix, &table), "a?");
    }

    #[test]
    fn test_reverse_of_blank_cell_is_space_when_table_has_space() {
        let table = TranslationTable::builtin();
        let matrix = text_to_cells("@", &table);
        assert_eq!(cells_to_text(&matrix, &table), " ");
    }

    #[test]
    fn test_eight_dot_table_produces_eight_dot_cells() {
        let table = TranslationTable::from_definition(&TableLoader::new().load("ueb_grade1_8dot"));
        let matrix = text_to_cells("a1", &table);
        assert_eq!(matrix.width(), Some(DotWidth::Eight));
        assert_eq!(matrix.cells()[1].dot_numbers(), vec![1, 8]);
    }
}
