//! Writer that logs frames instead of sending them.
//!
//! Used by `braille-host run` when no physical transport is wired in: every
//! frame shows up in the log as `frame=<hex>` tagged with the device id.

use braille_core::{OutputWriter, WriteError};
use tracing::info;

#[derive(Debug, Clone)]
pub struct TraceWriter {
    device_id: String,
}

impl TraceWriter {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }
}

impl OutputWriter for TraceWriter {
    fn write(&self, frame: &[u8]) -> Result<(), WriteError> {
        info!(device_id = %self.device_id, frame = %hex::encode(frame), "output frame");
        Ok(())
    }
}
