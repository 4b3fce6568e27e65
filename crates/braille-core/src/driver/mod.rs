//! Vendor display drivers.
//!
//! A [`Driver`] is bound to one device and turns that device's raw input
//! reports into [`BrailleEvent`]s and [`CellMatrix`] updates into output
//! frames.  The set of vendors is closed and known at build time, so it is a
//! [`DriverKind`] enum rather than a trait object.
//!
//! # Variants (for beginners)
//!
//! | Kind          | Key             | Input            | Output frame          |
//! |---------------|-----------------|------------------|-----------------------|
//! | `Simulated`   | `sim`           | UTF-8 text       | none (records matrix) |
//! | `GenericHid`  | `generic-hid`   | UTF-8 text       | none                  |
//! | `Focus`       | `focus-generic` | framed + chords  | `0x20`, cursor byte   |
//! | `HandyTech`   | `handytech`     | framed           | `0x10`                |
//! | `Hims`        | `hims`          | framed           | `0x30`, cursor byte   |
//!
//! Physical output goes through an [`OutputWriter`] attached with
//! [`Driver::attach_writer`].  The driver never owns the device handle; it
//! only holds a shared reference to whatever sink the host gave it.
//!
//! # Failure model
//!
//! Nothing here returns an error to the caller.  Malformed reports decode to
//! no events; a failing writer is logged and the frame is still kept as
//! [`Driver::last_frame`].

pub mod frame;
pub mod profile;
pub mod report;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::domain::cell::CellMatrix;
use crate::domain::device::DeviceInfo;
use crate::domain::event::BrailleEvent;

pub use profile::VendorProfile;

// ── Output writer seam ────────────────────────────────────────────────────────

/// How a driver prefers to hand frames to its writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Call [`OutputWriter::write`] and wait for it.
    Blocking,
    /// Call [`OutputWriter::write_async`], which must not wait on I/O.
    FireAndForget,
}

/// Errors an output writer may report.  Drivers log and swallow them.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The sink has been shut down.
    #[error("output writer is closed")]
    Closed,

    /// The sink refused the frame (queue full, device busy, …).
    #[error("output writer rejected the frame: {0}")]
    Rejected(String),

    /// The underlying handle failed.
    #[error("output I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sink for encoded output frames, owned outside the driver.
#[cfg_attr(test, mockall::automock)]
pub trait OutputWriter: Send + Sync {
    /// Writes one frame, blocking until the sink accepted it.
    fn write(&self, frame: &[u8]) -> Result<(), WriteError>;

    /// Hands one frame off without waiting on I/O.
    ///
    /// The default forwards to [`OutputWriter::write`]; sinks backed by a
    /// queue override it.
    fn write_async(&self, frame: Vec<u8>) -> Result<(), WriteError> {
        self.write(&frame)
    }
}

// ── Driver kind ───────────────────────────────────────────────────────────────

/// The closed set of protocol variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverKind {
    /// In-memory simulator that records traffic.
    Simulated,
    /// Fallback for unknown hardware: text in, nothing out.
    GenericHid,
    Focus,
    HandyTech,
    Hims,
}

impl DriverKind {
    pub const ALL: [DriverKind; 5] = [
        DriverKind::Simulated,
        DriverKind::GenericHid,
        DriverKind::Focus,
        DriverKind::HandyTech,
        DriverKind::Hims,
    ];

    /// Registry key of this variant.
    pub fn key(self) -> &'static str {
        match self {
            DriverKind::Simulated => "sim",
            DriverKind::GenericHid => "generic-hid",
            DriverKind::Focus => profile::FOCUS.key,
            DriverKind::HandyTech => profile::HANDYTECH.key,
            DriverKind::Hims => profile::HIMS.key,
        }
    }

    /// Variant registered under `key`, if any.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Framing parameters, or `None` for the text-only variants.
    pub fn profile(self) -> Option<&'static VendorProfile> {
        match self {
            DriverKind::Simulated | DriverKind::GenericHid => None,
            DriverKind::Focus => Some(&profile::FOCUS),
            DriverKind::HandyTech => Some(&profile::HANDYTECH),
            DriverKind::Hims => Some(&profile::HIMS),
        }
    }

    pub fn write_mode(self) -> WriteMode {
        self.profile()
            .map_or(WriteMode::Blocking, |profile| profile.write_mode)
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// One protocol driver instance bound to at most one device.
pub struct Driver {
    kind: DriverKind,
    device: Option<DeviceInfo>,
    writer: Option<Arc<dyn OutputWriter>>,
    last_frame: Option<Vec<u8>>,
    /// Simulator only: every matrix passed to `encode`.
    sent: Vec<CellMatrix>,
    /// Simulator only: every packet passed to `decode`.
    received: Vec<Vec<u8>>,
}

impl Driver {
    /// Creates a closed driver of the given kind.
    pub fn new(kind: DriverKind) -> Self {
        Self {
            kind,
            device: None,
            writer: None,
            last_frame: None,
            sent: Vec::new(),
            received: Vec::new(),
        }
    }

    pub fn simulated() -> Self {
        Self::new(DriverKind::Simulated)
    }

    pub fn generic_hid() -> Self {
        Self::new(DriverKind::GenericHid)
    }

    pub fn focus() -> Self {
        Self::new(DriverKind::Focus)
    }

    pub fn handytech() -> Self {
        Self::new(DriverKind::HandyTech)
    }

    pub fn hims() -> Self {
        Self::new(DriverKind::Hims)
    }

    pub fn kind(&self) -> DriverKind {
        self.kind
    }

    /// Binds the driver to `device`.  Opening an open driver rebinds it.
    pub fn open(&mut self, device: DeviceInfo) {
        debug!(driver = %self.kind, device_id = %device.id, "driver opened");
        self.device = Some(device);
    }

    /// Releases the bound device and writer.  Safe to call when closed.
    pub fn close(&mut self) {
        if let Some(device) = self.device.take() {
            debug!(driver = %self.kind, device_id = %device.id, "driver closed");
        }
        self.writer = None;
    }

    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    pub fn device(&self) -> Option<&DeviceInfo> {
        self.device.as_ref()
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device.as_ref().map(|d| d.id.as_str())
    }

    /// Attaches the sink frames are written to, replacing any previous one.
    pub fn attach_writer(&mut self, writer: Arc<dyn OutputWriter>) {
        self.writer = Some(writer);
    }

    pub fn has_writer(&self) -> bool {
        self.writer.is_some()
    }

    /// The write method this variant invokes on its writer.
    pub fn preferred_write_mode(&self) -> WriteMode {
        self.kind.write_mode()
    }

    /// Decodes one raw input report into events stamped with the bound device id.
    pub fn decode(&mut self, packet: &[u8]) -> Vec<BrailleEvent> {
        if self.kind == DriverKind::Simulated {
            self.received.push(packet.to_vec());
        }
        let device_id = self.device.as_ref().map(|d| d.id.as_str());
        let events = match self.kind.profile() {
            Some(profile) => report::decode_report(profile, packet, device_id),
            None => report::decode_text(packet, device_id),
        };
        trace!(driver = %self.kind, bytes = packet.len(), events = events.len(), "report decoded");
        events
    }

    /// Encodes `matrix` into a frame, keeps it as the last frame, and writes
    /// it to the attached writer if there is one.
    ///
    /// Returns the frame, or `None` for variants that produce no output frames.
    pub fn encode(&mut self, matrix: &CellMatrix) -> Option<Vec<u8>> {
        if self.kind == DriverKind::Simulated {
            self.sent.push(matrix.clone());
        }
        let profile = self.kind.profile()?;
        let frame = frame::encode_frame(profile, matrix);
        self.last_frame = Some(frame.clone());

        if let Some(writer) = &self.writer {
            let result = match profile.write_mode {
                WriteMode::Blocking => writer.write(&frame),
                WriteMode::FireAndForget => writer.write_async(frame.clone()),
            };
            if let Err(e) = result {
                warn!(
                    driver = %self.kind,
                    device_id = self.device_id().unwrap_or("-"),
                    error = %e,
                    "frame write failed"
                );
            }
        }
        Some(frame)
    }

    /// The most recent frame `encode` produced, written or not.
    pub fn last_frame(&self) -> Option<&[u8]> {
        self.last_frame.as_deref()
    }

    /// Matrices recorded by the simulator.
    pub fn sent_matrices(&self) -> &[CellMatrix] {
        &self.sent
    }

    /// Packets recorded by the simulator.
    pub fn received_packets(&self) -> &[Vec<u8>] {
        &self.received
    }
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("kind", &self.kind)
            .field("device_id", &self.device_id())
            .field("has_writer", &self.writer.is_some())
            .field("last_frame", &self.last_frame)
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::{BrailleCell, DotWidth};
    use crate::domain::device::Transport;
    use crate::domain::event::EventKind;

    fn device(id: &str) -> DeviceInfo {
        DeviceInfo::new(id, Transport::Usb)
    }

    fn two_cells() -> CellMatrix {
        let cells = vec![
            BrailleCell::from_dot_numbers(DotWidth::Six, &[1, 3]).unwrap(),
            BrailleCell::empty(DotWidth::Six),
        ];
        CellMatrix::new(cells, Some(0)).unwrap()
    }

    #[test]
    fn test_kind_keys_round_trip() {
        for kind in DriverKind::ALL {
            assert_eq!(DriverKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(DriverKind::from_key("nope"), None);
    }

    #[test]
    fn test_open_close_lifecycle() {
        // Arrange
        let mut driver = Driver::focus();
        assert!(!driver.is_open());

        // Act / Assert
        driver.open(device("a"));
        assert_eq!(driver.device_id(), Some("a"));
        driver.open(device("b"));
        assert_eq!(driver.device_id(), Some("b"));
        driver.close();
        assert!(!driver.is_open());
        driver.close();
        assert!(!driver.is_open());
    }

    #[test]
    fn test_close_drops_writer() {
        let mut driver = Driver::focus();
        driver.attach_writer(Arc::new(MockOutputWriter::new()));
        driver.close();
        assert!(!driver.has_writer());
    }

    #[test]
    fn test_focus_decode_stamps_device_id() {
        let mut driver = Driver::focus();
        driver.open(device("usb:05f3:0007"));
        let events = driver.decode(&[0x01, b'a', 0x0D]);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].device_id.as_deref(), Some("usb:05f3:0007"));
    }

    #[test]
    fn test_closed_driver_decodes_without_device_id() {
        let mut driver = Driver::focus();
        let events = driver.decode(&[0x01, 0x8D]);
        assert_eq!(events[0].kind, EventKind::Chord);
        assert_eq!(events[0].device_id, None);
    }

    #[test]
    fn test_generic_hid_degrades_to_text_and_has_no_frame() {
        // Arrange
        let mut driver = Driver::generic_hid();

        // Act
        let events = driver.decode(&[0x02, b'h', b'i']);
        let frame = driver.encode(&two_cells());

        // Assert
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Text);
        assert_eq!(events[0].text.as_deref(), Some("\u{2}hi"));
        assert!(frame.is_none());
        assert!(driver.last_frame().is_none());
    }

    #[test]
    fn test_simulator_records_traffic() {
        let mut driver = Driver::simulated();
        driver.decode(b"hello");
        driver.encode(&two_cells());

        assert_eq!(driver.received_packets(), &[b"hello".to_vec()]);
        assert_eq!(driver.sent_matrices(), &[two_cells()]);
        assert!(driver.last_frame().is_none());
    }

    #[test]
    fn test_encode_retains_last_frame_without_writer() {
        let mut driver = Driver::focus();
        let frame = driver.encode(&two_cells()).unwrap();
        assert_eq!(frame[1], 2);
        assert_eq!(frame[3], 5);
        assert_eq!(driver.last_frame(), Some(frame.as_slice()));
    }

    #[test]
    fn test_fire_and_forget_variant_uses_write_async() {
        // Arrange
        let mut writer = MockOutputWriter::new();
        writer.expect_write().never();
        writer
            .expect_write_async()
            .withf(|frame: &Vec<u8>| frame[0] == 0x20)
            .times(1)
            .returning(|_| Ok(()));
        let mut driver = Driver::focus();
        driver.attach_writer(Arc::new(writer));

        // Act
        driver.encode(&two_cells());

        // Assert
        assert_eq!(driver.preferred_write_mode(), WriteMode::FireAndForget);
    }

    #[test]
    fn test_blocking_variant_uses_write() {
        let mut writer = MockOutputWriter::new();
        writer.expect_write_async().never();
        writer.expect_write().times(1).returning(|_| Ok(()));
        let mut driver = Driver::handytech();
        driver.attach_writer(Arc::new(writer));

        driver.encode(&two_cells());

        assert_eq!(driver.preferred_write_mode(), WriteMode::Blocking);
    }

    #[test]
    fn test_writer_failure_is_swallowed_and_frame_kept() {
        // Arrange
        let mut writer = MockOutputWriter::new();
        writer
            .expect_write_async()
            .returning(|_| Err(WriteError::Closed));
        let mut driver = Driver::hims();
        driver.attach_writer(Arc::new(writer));

        // Act
        let frame = driver.encode(&two_cells());

        // Assert
        assert!(frame.is_some());
        assert_eq!(driver.last_frame().map(|f| f[0]), Some(0x30));
    }
}
