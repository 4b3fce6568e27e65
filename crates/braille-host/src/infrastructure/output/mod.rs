//! Output-frame sinks.
//!
//! Everything here implements [`braille_core::OutputWriter`], the seam the
//! drivers write vendor frames through:
//!
//! - [`dispatcher::FrameDispatcher`] – bounded queue plus a fixed worker
//!   pool, used for fire-and-forget writes.
//! - [`memory::RecordingWriter`] – keeps every frame in memory.
//! - [`trace::TraceWriter`] – logs every frame as hex through `tracing`.

pub mod dispatcher;
pub mod memory;
pub mod trace;

pub use dispatcher::{DispatchError, FrameDispatcher};
pub use memory::RecordingWriter;
pub use trace::TraceWriter;
