//! Runtime loop.
//!
//! Owns the single-threaded `tokio` runtime and drives one emitter run on it.

mod current_thread;

pub use current_thread::Runtime;
