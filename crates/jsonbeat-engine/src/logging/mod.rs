//! Logging utilities.
//!
//! Centralizes logger initialization. Diagnostics always go to stderr:
//! stdout is reserved for the payload stream.

mod init;

pub use init::{init_logging, LoggingConfig};
