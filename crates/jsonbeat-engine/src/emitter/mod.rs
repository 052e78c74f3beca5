//! Heartbeat emitter.
//!
//! Writes a status object every interval until the lifetime elapses, then
//! writes one final object and stops. All writes go to a single `io::Write`
//! sink in issuance order.

mod chunk;
mod heartbeat;

pub use chunk::Chunk;
pub use heartbeat::{Emitter, EmitterConfig, EmitterState, RunReport};
