//! Wire format of the **jsonbeat** status stream.
//!
//! The emitter writes JSON objects back to back on stdout with no separator.
//! This crate holds the payload shape and the tools a consumer needs to read
//! such a stream back.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`payload`] | `Template`, `StatusPayload`, `Nested` fixture |
//! | [`decoder`] | `Decoder`, `decode_str` |
//! | [`filter`] | `Filter`, `Selection`, `filter_value`, `filter_str` |
//! | [`verify`] | `verify`, `Expectations`, `StreamSummary` |
//! | [`error`] | `DecodeError`, `VerifyError`, `FilterError` |
//!
//! # Quick start
//!
//! ```rust
//! use jsonbeat_wire::{decode_str, StatusPayload};
//!
//! let src = r#"{"start":1,"nested":{"thing":"something","things":[{"foo":"bar","baz":"buz"}]},"now":101}"#;
//! let values = decode_str(src).unwrap();
//! let payload: StatusPayload = serde_json::from_value(values[0].clone()).unwrap();
//! assert_eq!(payload.now - payload.start, 100);
//! ```

pub mod decoder;
pub mod error;
pub mod filter;
pub mod payload;
pub mod verify;

pub use decoder::{decode_str, Decoder};
pub use error::{DecodeError, FilterError, VerifyError};
pub use filter::{filter_str, filter_value, Filter, Selection};
pub use payload::{Nested, StatusPayload, Template, Thing};
pub use verify::{verify, Expectations, StreamSummary};
