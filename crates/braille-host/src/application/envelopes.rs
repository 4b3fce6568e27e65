//! Event envelopes forwarded to the orchestrator.
//!
//! Two envelope kinds are produced:
//!
//! - `braille.input` – one per decoded [`BrailleEvent`];
//! - `caps.report`   – one per attached device, describing the adapter.
//!
//! Both carry `schema_version`, a random `id`, a `timestamp` in microseconds
//! since the Unix epoch, and the configured `source`.

use std::time::{SystemTime, UNIX_EPOCH};

use braille_core::{BrailleEvent, DeviceInfo};
use serde_json::{json, Value};
use uuid::Uuid;

pub const SCHEMA_VERSION: &str = "2.0";
pub const INPUT_EVENT_TYPE: &str = "braille.input";
pub const CAPS_EVENT_TYPE: &str = "caps.report";

/// Scope a consumer needs to read `braille.input` envelopes.
pub const INPUT_AUTH_SCOPE: &str = "braille.input.read";

/// Who the envelopes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeSource {
    pub source: String,
    pub person_id: Option<String>,
}

impl EnvelopeSource {
    pub fn new(source: impl Into<String>, person_id: Option<String>) -> Self {
        Self {
            source: source.into(),
            person_id: person_id.filter(|p| !p.is_empty()),
        }
    }

    /// Wraps one input event.
    pub fn input_envelope(&self, event: &BrailleEvent) -> Value {
        json!({
            "schema_version": SCHEMA_VERSION,
            "id": Uuid::new_v4().to_string(),
            "timestamp": timestamp_us(),
            "source": self.source,
            "event_type": INPUT_EVENT_TYPE,
            "intent": {
                "type": "input.command",
                "command": "braille",
                "payload": {
                    "keys": event.keys,
                    "text": event.text,
                    "event_type": event.kind.as_str(),
                },
            },
            "person": self.person_id.as_ref().map(|id| json!({ "id": id })),
            "auth_scope": INPUT_AUTH_SCOPE,
            "metadata": { "device_id": event.device_id },
        })
    }

    /// Describes an attached adapter.
    pub fn caps_envelope(&self, device: &DeviceInfo, driver_key: &str) -> Value {
        json!({
            "schema_version": SCHEMA_VERSION,
            "id": Uuid::new_v4().to_string(),
            "timestamp": timestamp_us(),
            "source": self.source,
            "event_type": CAPS_EVENT_TYPE,
            "payload": {
                "person_id": self.person_id,
                "caps": {
                    "braille_adapter": {
                        "present": true,
                        "device_id": device.id,
                        "transport": device.transport,
                        "vid": device.vid,
                        "pid": device.pid,
                        "name": device.name,
                        "driver_key": driver_key,
                        "capabilities": device.capabilities,
                    }
                },
            },
        })
    }
}

fn timestamp_us() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros() as u64
}
