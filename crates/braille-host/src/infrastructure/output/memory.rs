//! In-memory output writer.
//!
//! Stores every frame it is handed, so tests and the CLI can inspect exactly
//! what a driver would have sent to the display.  It can be switched into a
//! failing mode to exercise error paths.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use braille_core::{OutputWriter, WriteError};

/// Records frames instead of sending them anywhere.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    frames: Mutex<Vec<Vec<u8>>>,
    failing: AtomicBool,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer that rejects every frame until [`set_failing(false)`](Self::set_failing).
    pub fn failing() -> Self {
        let writer = Self::default();
        writer.set_failing(true);
        writer
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Copy of every frame written so far, oldest first.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Vec<u8>>> {
        self.frames
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl OutputWriter for RecordingWriter {
    fn write(&self, frame: &[u8]) -> Result<(), WriteError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(WriteError::Rejected("recording writer is failing".to_string()));
        }
        self.lock().push(frame.to_vec());
        Ok(())
    }
}
