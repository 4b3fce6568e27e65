//! Per-vendor protocol parameters.
//!
//! The framed vendors share one report layout and one frame layout; they only
//! differ in the values collected here.  A [`VendorProfile`] is plain
//! configuration, so adding a vendor means adding a constant, not code.

use super::WriteMode;

/// First byte of an input report carrying key presses.
pub const KEYS_REPORT: u8 = 0x01;

/// First byte of an input report carrying routing-key indices.
pub const ROUTING_REPORT: u8 = 0x02;

/// Cursor byte meaning "no cursor".
pub const NO_CURSOR: u8 = 0xFF;

/// Most cells one frame can describe (the count is a single byte).
pub const MAX_FRAME_CELLS: usize = 255;

/// Printable ASCII bytes decode to literal text.
pub const PRINTABLE: std::ops::RangeInclusive<u8> = 0x20..=0x7E;

/// Chord bytes carry a dot mask in the low seven bits under a set high bit.
pub const CHORD_FLAG: u8 = 0x80;

/// Protocol parameters of one framed vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorProfile {
    /// Driver key the variant is registered under.
    pub key: &'static str,
    /// Key-report byte → navigation key name.  Checked before text, so a nav
    /// code inside the printable range shadows the character.
    pub nav_codes: &'static [(u8, &'static str)],
    /// Whether high-bit bytes decode as Braille keyboard chords.
    pub chording: bool,
    /// First byte of every output frame.
    pub frame_header: u8,
    /// Whether frames carry a cursor byte after the cell count.
    pub cursor_byte: bool,
    /// How frames should be handed to an attached writer.
    pub write_mode: WriteMode,
}

impl VendorProfile {
    /// Navigation key name for a key-report byte.
    pub fn nav_key(&self, byte: u8) -> Option<&'static str> {
        self.nav_codes
            .iter()
            .find(|(code, _)| *code == byte)
            .map(|(_, name)| *name)
    }
}

pub const FOCUS: VendorProfile = VendorProfile {
    key: "focus-generic",
    nav_codes: &[(0x0D, "enter"), (0x08, "back"), (0x1B, "escape")],
    chording: true,
    frame_header: 0x20,
    cursor_byte: true,
    write_mode: WriteMode::FireAndForget,
};

pub const HANDYTECH: VendorProfile = VendorProfile {
    key: "handytech",
    nav_codes: &[(0x0D, "enter"), (0x08, "back"), (0x09, "tab")],
    chording: false,
    frame_header: 0x10,
    cursor_byte: false,
    write_mode: WriteMode::Blocking,
};

pub const HIMS: VendorProfile = VendorProfile {
    key: "hims",
    nav_codes: &[
        (0x0D, "enter"),
        (0x08, "back"),
        (0x1B, "escape"),
        (0x20, "space"),
    ],
    chording: false,
    frame_header: 0x30,
    cursor_byte: true,
    write_mode: WriteMode::FireAndForget,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_key_lookup() {
        assert_eq!(FOCUS.nav_key(0x0D), Some("enter"));
        assert_eq!(HANDYTECH.nav_key(0x09), Some("tab"));
        assert_eq!(FOCUS.nav_key(0x09), None);
    }

    #[test]
    fn test_frame_header_per_vendor() {
        assert_eq!(FOCUS.frame_header, 0x20);
        assert_eq!(HANDYTECH.frame_header, 0x10);
        assert_eq!(HIMS.frame_header, 0x30);
    }

    #[test]
    fn test_frame_headers_are_distinct() {
        let headers = [FOCUS.frame_header, HANDYTECH.frame_header, HIMS.frame_header];
        for (i, a) in headers.iter().enumerate() {
            for b in &headers[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_only_focus_chords() {
        assert!(FOCUS.chording);
        assert!(!HANDYTECH.chording);
        assert!(!HIMS.chording);
    }
}
