use std::io;

use serde_json::de::{IoRead, StreamDeserializer};
use serde_json::{Deserializer, Value};

use crate::error::DecodeError;

// ── Decoder ───────────────────────────────────────────────────────────────

/// Splits an undelimited stream of JSON values read from `R`.
///
/// Chunks need no separator between them; whitespace between values is
/// skipped. `R` should be buffered (e.g. `StdinLock` or `BufReader`).
pub struct Decoder<R: io::Read> {
    inner: StreamDeserializer<'static, IoRead<R>, Value>,
    failed: bool,
}

impl<R: io::Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: Deserializer::from_reader(reader).into_iter::<Value>(),
            failed: false,
        }
    }

    /// Bytes consumed by values decoded so far.
    pub fn byte_offset(&self) -> usize {
        self.inner.byte_offset()
    }
}

impl<R: io::Read> Iterator for Decoder<R> {
    type Item = Result<Value, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        // The underlying deserializer cannot resynchronise after a syntax error.
        if self.failed {
            return None;
        }
        let item = self.inner.next()?;
        Some(item.map_err(|err| {
            self.failed = true;
            DecodeError::from_json(&err, self.inner.byte_offset())
        }))
    }
}

// ── decode_str ────────────────────────────────────────────────────────────

/// Decode every value in `src`, failing on the first malformed chunk.
pub fn decode_str(src: &str) -> Result<Vec<Value>, DecodeError> {
    let mut stream = Deserializer::from_str(src).into_iter::<Value>();
    let mut values = Vec::new();
    while let Some(item) = stream.next() {
        match item {
            Ok(value) => values.push(value),
            Err(err) => return Err(DecodeError::from_json(&err, stream.byte_offset())),
        }
    }
    Ok(values)
}
