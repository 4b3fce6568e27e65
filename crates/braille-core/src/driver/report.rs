//! Input report decoding.
//!
//! Framed report layout:
//!
//! ```text
//! [kind:1][byte:1]*
//!
//! kind 0x01 (keys)     each byte: nav code │ chord (0x80 | dots) │ printable ASCII │ dropped
//! kind 0x02 (routing)  each byte: 0-based cell index
//! ```
//!
//! Decoding never fails.  Empty packets, unknown report kinds, and bytes that
//! fit no class produce no events.

use crate::domain::event::BrailleEvent;

use super::profile::{VendorProfile, CHORD_FLAG, KEYS_REPORT, PRINTABLE, ROUTING_REPORT};

/// Decodes one framed report with a vendor's key tables.
///
/// Events come out in the order of their triggering bytes.
///
/// # Examples
///
/// ```rust
/// use braille_core::driver::profile::FOCUS;
/// use braille_core::driver::report::decode_report;
///
/// let events = decode_report(&FOCUS, &[0x01, b'a', 0x0D], None);
/// assert_eq!(events[0].text.as_deref(), Some("a"));
/// assert!(events[1].has_key("enter"));
/// ```
pub fn decode_report(
    profile: &VendorProfile,
    packet: &[u8],
    device_id: Option<&str>,
) -> Vec<BrailleEvent> {
    let Some((&kind, body)) = packet.split_first() else {
        return Vec::new();
    };
    match kind {
        KEYS_REPORT => body
            .iter()
            .filter_map(|&byte| decode_key_byte(profile, byte, device_id))
            .collect(),
        ROUTING_REPORT => body
            .iter()
            .map(|&index| BrailleEvent::routing(index, device_id))
            .collect(),
        _ => Vec::new(),
    }
}

fn decode_key_byte(profile: &VendorProfile, byte: u8, device_id: Option<&str>) -> Option<BrailleEvent> {
    if let Some(name) = profile.nav_key(byte) {
        return Some(BrailleEvent::nav(name, device_id));
    }
    if profile.chording && byte & CHORD_FLAG != 0 {
        let dots = chord_dots(byte);
        // A bare 0x80 carries no dots and is dropped below.
        if !dots.is_empty() {
            return Some(BrailleEvent::chord(&dots, device_id));
        }
    }
    if PRINTABLE.contains(&byte) {
        return Some(BrailleEvent::text(char::from(byte).to_string(), device_id));
    }
    None
}

/// 1-based dots raised in the low seven bits of a chord byte.
fn chord_dots(byte: u8) -> Vec<u8> {
    (0..7u8)
        .filter(|bit| byte & (1 << bit) != 0)
        .map(|bit| bit + 1)
        .collect()
}

/// Decodes an unframed packet as UTF-8 text.
///
/// Invalid sequences are dropped and surrounding whitespace trimmed; blank
/// results produce no event.
pub fn decode_text(packet: &[u8], device_id: Option<&str>) -> Vec<BrailleEvent> {
    let text: String = String::from_utf8_lossy(packet)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect();
    let text = text.trim();
    if text.is_empty() {
        Vec::new()
    } else {
        vec![BrailleEvent::text(text, device_id)]
    }
}
