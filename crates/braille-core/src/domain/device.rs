//! Attached-device records.
//!
//! A [`DeviceInfo`] is produced by discovery (USB/Bluetooth enumeration) or by
//! a manual attach request, and is owned by the device manager for as long as
//! the device stays attached.  This crate never enumerates hardware itself; it
//! only consumes these records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Capability key carrying the driver selection hint.
pub const DRIVER_KEY_CAPABILITY: &str = "driver_key";

/// Known USB vendor/product ids and the driver key they select.
///
/// A `None` product id matches every product of that vendor.  Entries are
/// checked in order, so exact product matches must come before vendor-wide
/// wildcards.
pub const KNOWN_USB_DEVICES: &[(&str, Option<&str>, &str)] = &[
    // Freedom Scientific (Focus line)
    ("0x05f3", Some("0x0007"), "focus-generic"),
    ("0x05f3", None, "focus-generic"),
    // Handy Tech Elektronik
    ("0x1fe4", None, "handytech"),
    // HIMS (BrailleSense / BrailleEdge)
    ("0x2001", None, "hims"),
];

/// Looks up the driver key hint for a USB vendor/product pair.
///
/// Ids are compared case-insensitively in `0x`-prefixed hex form.
pub fn driver_key_hint(vid: &str, pid: &str) -> Option<&'static str> {
    KNOWN_USB_DEVICES
        .iter()
        .find(|(v, p, _)| {
            v.eq_ignore_ascii_case(vid) && p.map_or(true, |p| p.eq_ignore_ascii_case(pid))
        })
        .map(|(_, _, key)| *key)
}

/// How the device is connected to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Usb,
    Bt,
    #[default]
    Sim,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transport::Usb => "usb",
            Transport::Bt => "bt",
            Transport::Sim => "sim",
        };
        f.write_str(name)
    }
}

/// Description of one attached (or attachable) Braille device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Transport-qualified identifier, e.g. `usb:0x05f3:0x0007` or `manual:1`.
    pub id: String,
    pub transport: Transport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form capability map.  Notable keys: `driver_key`, `cells`, `rows`, `cols`.
    #[serde(default)]
    pub capabilities: BTreeMap<String, Value>,
}

impl DeviceInfo {
    /// Creates a record with only an id and transport.
    pub fn new(id: impl Into<String>, transport: Transport) -> Self {
        Self {
            id: id.into(),
            transport,
            ..Self::default()
        }
    }

    /// Creates a USB record the way discovery would, filling the
    /// `driver_key` capability from [`KNOWN_USB_DEVICES`].
    pub fn usb(vid: &str, pid: &str, name: Option<&str>) -> Self {
        let vid = vid.to_ascii_lowercase();
        let pid = pid.to_ascii_lowercase();
        let mut capabilities = BTreeMap::new();
        let hint = driver_key_hint(&vid, &pid)
            .map(|key| Value::String(key.to_string()))
            .unwrap_or(Value::Null);
        capabilities.insert(DRIVER_KEY_CAPABILITY.to_string(), hint);
        Self {
            id: format!("usb:{vid}:{pid}"),
            transport: Transport::Usb,
            vid: Some(vid),
            pid: Some(pid),
            name: Some(name.unwrap_or("unknown").to_string()),
            capabilities,
        }
    }

    /// Sets a capability, returning `self` for chaining.
    pub fn with_capability(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.capabilities.insert(key.to_string(), value.into());
        self
    }

    /// The `driver_key` capability, if present and a non-empty string.
    pub fn driver_key(&self) -> Option<&str> {
        self.capabilities
            .get(DRIVER_KEY_CAPABILITY)
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
    }

    /// The synthesized `"<vid>:<pid>"` key, if both ids are known.
    pub fn vid_pid_key(&self) -> Option<String> {
        match (self.vid.as_deref(), self.pid.as_deref()) {
            (Some(vid), Some(pid)) if !vid.is_empty() && !pid.is_empty() => {
                Some(format!("{vid}:{pid}"))
            }
            _ => None,
        }
    }

    /// Declared number of display cells, if the capability map carries one.
    pub fn cell_count(&self) -> Option<u64> {
        ["cells", "cols"]
            .iter()
            .find_map(|key| self.capabilities.get(*key).and_then(Value::as_u64))
    }
}
