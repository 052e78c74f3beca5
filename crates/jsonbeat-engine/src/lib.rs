//! jsonbeat engine crate.
//!
//! Owns the emitter loop, its clock, and the single-threaded runtime that
//! drives it. The payload shape itself lives in `jsonbeat-wire`.

pub mod emitter;
pub mod logging;
pub mod runtime;
pub mod time;
