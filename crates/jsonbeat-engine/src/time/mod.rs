//! Time subsystem.
//!
//! Provides the emitter's wall-clock timestamps without coupling to the loop.
//! Intended usage:
//! - one `EmitClock` per emitter, created at startup
//! - call `now_ms()` once per emission

mod emit_clock;

pub use emit_clock::{EmitClock, epoch_ms};
