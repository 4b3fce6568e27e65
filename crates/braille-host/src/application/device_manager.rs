//! DeviceManager: the attached-device table.
//!
//! Each attached device id owns exactly one open [`Driver`].  The manager
//! picks the driver key for a device in this order:
//!
//! 1. the `driver_key` capability, if that key is registered;
//! 2. the synthesized `"<vid>:<pid>"` key, if both ids are known and registered;
//! 3. the [`GENERIC_HID_KEY`] fallback.
//!
//! # Locking (for beginners)
//!
//! There are two levels of locks:
//!
//! ```text
//! devices: Mutex<HashMap<id, AttachedDevice>>     held only to look up / insert / remove
//!                         │
//!                         └─► driver: Arc<Mutex<Driver>>   held while decoding or encoding
//! ```
//!
//! `attach`/`detach` serialize on the table lock.  `decode`/`encode` take the
//! table lock just long enough to clone the driver's `Arc`, then lock only
//! that driver, so traffic for different devices never contends.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use braille_core::{BrailleEvent, CellMatrix, DeviceInfo, Driver, OutputWriter};
use serde::Serialize;
use tracing::{debug, info};

use super::driver_registry::{DriverRegistry, GENERIC_HID_KEY};

/// A live driver shared between the manager and in-flight calls.
pub type SharedDriver = Arc<Mutex<Driver>>;

/// One entry of the device table.
#[derive(Debug, Clone)]
pub struct AttachedDevice {
    pub info: DeviceInfo,
    pub driver_key: String,
    pub driver: SharedDriver,
}

/// Snapshot of an attached device for listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSummary {
    pub device: DeviceInfo,
    pub driver_key: String,
}

/// Id → driver table with driver-key resolution.
#[derive(Debug, Default)]
pub struct DeviceManager {
    registry: DriverRegistry,
    devices: Mutex<HashMap<String, AttachedDevice>>,
}

/// Recovers the data from a poisoned lock.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DeviceManager {
    pub fn new(registry: DriverRegistry) -> Self {
        Self {
            registry,
            devices: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &DriverRegistry {
        &self.registry
    }

    /// Driver key `attach` would pick for `device`.
    pub fn resolve_driver_key(&self, device: &DeviceInfo) -> String {
        if let Some(key) = device.driver_key().filter(|k| self.registry.contains(k)) {
            return key.to_string();
        }
        if let Some(key) = device.vid_pid_key().filter(|k| self.registry.contains(k)) {
            return key;
        }
        debug!(
            device_id = %device.id,
            hint = device.driver_key().unwrap_or("-"),
            "no registered driver matches; using fallback"
        );
        GENERIC_HID_KEY.to_string()
    }

    /// Opens a driver for `device` and stores it under `device.id`.
    ///
    /// A device already attached under the same id is closed and replaced.
    /// Returns the resolved driver key.
    pub fn attach(&self, device: DeviceInfo) -> String {
        self.attach_inner(device, None)
    }

    /// Like [`DeviceManager::attach`], with an output writer attached to the new driver.
    pub fn attach_with_writer(&self, device: DeviceInfo, writer: Arc<dyn OutputWriter>) -> String {
        self.attach_inner(device, Some(writer))
    }

    fn attach_inner(&self, device: DeviceInfo, writer: Option<Arc<dyn OutputWriter>>) -> String {
        let driver_key = self.resolve_driver_key(&device);
        let mut driver = self
            .registry
            .create(&driver_key)
            .unwrap_or_else(Driver::generic_hid);
        driver.open(device.clone());
        if let Some(writer) = writer {
            driver.attach_writer(writer);
        }

        let id = device.id.clone();
        let entry = AttachedDevice {
            info: device,
            driver_key: driver_key.clone(),
            driver: Arc::new(Mutex::new(driver)),
        };

        let previous = lock(&self.devices).insert(id.clone(), entry);
        if let Some(previous) = previous {
            lock(&previous.driver).close();
            info!(device_id = %id, old = %previous.driver_key, new = %driver_key, "device re-attached; previous driver closed");
        } else {
            info!(device_id = %id, driver = %driver_key, "device attached");
        }
        driver_key
    }

    /// Closes and removes the driver for `id`.  Returns `false` if nothing
    /// was attached under that id.
    pub fn detach(&self, id: &str) -> bool {
        let removed = lock(&self.devices).remove(id);
        match removed {
            Some(entry) => {
                lock(&entry.driver).close();
                info!(device_id = %id, "device detached");
                true
            }
            None => false,
        }
    }

    /// The live driver for `id`.
    pub fn driver(&self, id: &str) -> Option<SharedDriver> {
        lock(&self.devices).get(id).map(|entry| Arc::clone(&entry.driver))
    }

    /// The resolved driver key for `id`.
    pub fn driver_key(&self, id: &str) -> Option<String> {
        lock(&self.devices).get(id).map(|entry| entry.driver_key.clone())
    }

    /// Decodes a report from device `id`.  Unknown ids give no events.
    pub fn decode(&self, id: &str, packet: &[u8]) -> Vec<BrailleEvent> {
        let Some(driver) = self.driver(id) else {
            debug!(device_id = %id, "report for unattached device dropped");
            return Vec::new();
        };
        let events = lock(&driver).decode(packet);
        events
    }

    /// Encodes `matrix` for device `id`.  Returns the frame, if the device
    /// is attached and its driver frames output.
    pub fn encode(&self, id: &str, matrix: &CellMatrix) -> Option<Vec<u8>> {
        let driver = self.driver(id)?;
        let frame = lock(&driver).encode(matrix);
        frame
    }

    /// Every attached device, sorted by id.
    pub fn devices(&self) -> Vec<DeviceSummary> {
        let mut list: Vec<DeviceSummary> = lock(&self.devices)
            .values()
            .map(|entry| DeviceSummary {
                device: entry.info.clone(),
                driver_key: entry.driver_key.clone(),
            })
            .collect();
        list.sort_by(|a, b| a.device.id.cmp(&b.device.id));
        list
    }

    pub fn len(&self) -> usize {
        lock(&self.devices).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.devices).is_empty()
    }

    /// Closes and removes every driver.
    pub fn shutdown(&self) {
        let drained: Vec<(String, AttachedDevice)> = lock(&self.devices).drain().collect();
        for (id, entry) in &drained {
            lock(&entry.driver).close();
            debug!(device_id = %id, "driver closed at shutdown");
        }
        info!(count = drained.len(), "device manager shut down");
    }
}

impl Drop for DeviceManager {
    fn drop(&mut self) {
        let devices = self
            .devices
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for entry in devices.values() {
            lock(&entry.driver).close();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
