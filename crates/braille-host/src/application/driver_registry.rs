//! DriverRegistry: driver-key → driver constructor table.
//!
//! Keys come from three places: the built-in variants (`sim`,
//! `generic-hid`, `focus-generic`, `handytech`, `hims`), explicit
//! registrations made at start-up, and synthesized `"<vid>:<pid>"` keys for
//! specific hardware models.
//!
//! Registration is last-write-wins, except for [`GENERIC_HID_KEY`]: that key
//! is the fallback for unknown hardware and always builds the text-only
//! driver, so attempts to override it are refused.

use std::collections::HashMap;

use braille_core::{Driver, DriverKind};
use tracing::{debug, warn};

/// Builds a fresh, closed driver.
pub type DriverConstructor = fn() -> Driver;

/// Reserved fallback key.
pub const GENERIC_HID_KEY: &str = "generic-hid";

fn generic_hid() -> Driver {
    Driver::generic_hid()
}

/// Table of known driver keys.
#[derive(Debug, Clone)]
pub struct DriverRegistry {
    constructors: HashMap<String, DriverConstructor>,
}

impl DriverRegistry {
    /// A registry that only knows the reserved fallback.
    pub fn empty() -> Self {
        let mut constructors: HashMap<String, DriverConstructor> = HashMap::new();
        constructors.insert(GENERIC_HID_KEY.to_string(), generic_hid);
        Self { constructors }
    }

    /// A registry with every built-in variant under its key.
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(DriverKind::Simulated.key(), Driver::simulated);
        registry.register(DriverKind::Focus.key(), Driver::focus);
        registry.register(DriverKind::HandyTech.key(), Driver::handytech);
        registry.register(DriverKind::Hims.key(), Driver::hims);
        registry
    }

    /// Registers `constructor` under `key`, replacing any earlier entry.
    ///
    /// Returns `false` (and changes nothing) for the reserved
    /// [`GENERIC_HID_KEY`].
    pub fn register(&mut self, key: impl Into<String>, constructor: DriverConstructor) -> bool {
        let key = key.into();
        if key == GENERIC_HID_KEY {
            warn!(key = %key, "refusing to override the reserved fallback driver");
            return false;
        }
        if self.constructors.insert(key.clone(), constructor).is_some() {
            debug!(key = %key, "driver registration replaced");
        }
        true
    }

    /// Constructor registered under `key`.
    pub fn get(&self, key: &str) -> Option<DriverConstructor> {
        self.constructors.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.constructors.contains_key(key)
    }

    /// Builds a closed driver for `key`, if registered.
    pub fn create(&self, key: &str) -> Option<Driver> {
        self.get(key).map(|constructor| constructor())
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}
