//! Domain entities for the Braille host.
//!
//! This module contains plain value types with no infrastructure
//! dependencies.  Everything here can be constructed and compared in a unit
//! test without a device attached.

/// Braille cells and rectangular cell matrices.
pub mod cell;

/// Attached-device records and the known vendor/product hint table.
pub mod device;

/// Normalized input events produced by driver decoding.
pub mod event;
