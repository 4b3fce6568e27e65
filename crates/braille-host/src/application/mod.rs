//! Application layer for the Braille host.
//!
//! # What is the "application" layer? (for beginners)
//!
//! The *application* layer sits between the pure codecs in `braille_core`
//! and the infrastructure (files, worker threads, the terminal).  Code here
//! decides *which* driver serves a device and keeps track of attached
//! devices, but performs no I/O of its own.
//!
//! # Sub-modules
//!
//! - **`driver_registry`** – Maps driver-key strings to driver constructors.
//!   The `generic-hid` key is reserved and always resolves to the text-only
//!   fallback driver.
//!
//! - **`device_manager`** – The id → live driver table.  Resolves a driver
//!   key from a device's capability hints, opens the driver, and closes it
//!   again on detach, replacement, or shutdown.
//!
//! - **`envelopes`** – Builds the JSON envelopes (`braille.input`,
//!   `caps.report`) that are forwarded to an external orchestrator.

pub mod device_manager;
pub mod driver_registry;
pub mod envelopes;
