//! Output frame encoding.
//!
//! Frame layout:
//!
//! ```text
//! [header:1][count:1][cursor:1]?[mask:1]*count
//! ```
//!
//! - `header`: vendor frame kind ([`VendorProfile::frame_header`]).
//! - `count`: number of cells that follow, at most [`MAX_FRAME_CELLS`].
//! - `cursor`: 0-based cursor cell, or [`NO_CURSOR`]; only present when the
//!   vendor's profile says so.
//! - `mask`: one byte per cell, bit *i* set ⇔ dot *i + 1* raised.

use crate::domain::cell::CellMatrix;

use super::profile::{VendorProfile, MAX_FRAME_CELLS, NO_CURSOR};

/// Encodes a matrix into a vendor frame.
///
/// Cells beyond [`MAX_FRAME_CELLS`] are cut off.  A cursor that does not
/// fit in the encoded cells is written as [`NO_CURSOR`].
///
/// # Examples
///
/// ```rust
/// use braille_core::{BrailleCell, CellMatrix, DotWidth};
/// use braille_core::driver::frame::encode_frame;
/// use braille_core::driver::profile::FOCUS;
///
/// let cells = vec![
///     BrailleCell::from_dot_numbers(DotWidth::Six, &[1, 3]).unwrap(),
///     BrailleCell::empty(DotWidth::Six),
/// ];
/// let matrix = CellMatrix::new(cells, None).unwrap();
/// assert_eq!(encode_frame(&FOCUS, &matrix), vec![0x20, 2, 0xFF, 0b101, 0]);
/// ```
pub fn encode_frame(profile: &VendorProfile, matrix: &CellMatrix) -> Vec<u8> {
    let cells = &matrix.cells()[..matrix.columns().min(MAX_FRAME_CELLS)];
    let count = cells.len() as u8;

    let mut frame = Vec::with_capacity(3 + cells.len());
    frame.push(profile.frame_header);
    frame.push(count);
    if profile.cursor_byte {
        let cursor = matrix
            .cursor()
            .filter(|&c| c < cells.len())
            .map_or(NO_CURSOR, |c| c as u8);
        frame.push(cursor);
    }
    frame.extend(cells.iter().map(|cell| cell.mask()));
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::{BrailleCell, DotWidth};
    use crate::driver::profile::{FOCUS, HANDYTECH, HIMS};

    fn two_cells(cursor: Option<usize>) -> CellMatrix {
        let cells = vec![
            BrailleCell::from_dot_numbers(DotWidth::Six, &[1, 3]).unwrap(),
            BrailleCell::empty(DotWidth::Six),
        ];
        CellMatrix::new(cells, cursor).unwrap()
    }

    #[test]
    fn test_focus_frame_has_count_cursor_and_masks() {
        // Arrange
        let matrix = two_cells(Some(1));

        // Act
        let frame = encode_frame(&FOCUS, &matrix);

        // Assert
        assert_eq!(frame[0], 0x20);
        assert_eq!(frame[1], 2);
        assert_eq!(frame[2], 1);
        assert_eq!(frame[3], 0b0000_0101);
        assert_eq!(frame[4], 0);
    }

    #[test]
    fn test_handytech_frame_has_no_cursor_byte() {
        let frame = encode_frame(&HANDYTECH, &two_cells(Some(0)));
        assert_eq!(frame, vec![0x10, 2, 5, 0]);
    }

    #[test]
    fn test_hims_frame_uses_sentinel_without_cursor() {
        let frame = encode_frame(&HIMS, &two_cells(None));
        assert_eq!(frame, vec![0x30, 2, NO_CURSOR, 5, 0]);
    }

    #[test]
    fn test_empty_matrix_frame() {
        assert_eq!(encode_frame(&FOCUS, &CellMatrix::empty()), vec![0x20, 0, NO_CURSOR]);
    }

    #[test]
    fn test_eight_dot_mask_uses_high_bits() {
        let cell = BrailleCell::from_dot_numbers(DotWidth::Eight, &[7, 8]).unwrap();
        let matrix = CellMatrix::new(vec![cell], None).unwrap();
        assert_eq!(encode_frame(&HANDYTECH, &matrix)[2], 0b1100_0000);
    }

    #[test]
    fn test_oversized_matrix_is_cut_to_255_cells() {
        // Arrange
        let cells = vec![BrailleCell::from_mask(DotWidth::Six, 1).unwrap(); 300];
        let matrix = CellMatrix::new(cells, Some(299)).unwrap();

        // Act
        let frame = encode_frame(&FOCUS, &matrix);

        // Assert
        assert_eq!(frame[1], 255);
        assert_eq!(frame[2], NO_CURSOR);
        assert_eq!(frame.len(), 3 + 255);
    }
}
