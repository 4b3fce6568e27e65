//! Infrastructure layer for the Braille host.
//!
//! Contains the adapters that touch the outside world: configuration files
//! and the output-frame sinks.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `braille_core`, but MUST NOT be imported by the `application` layer.

pub mod output;
pub mod storage;
