use std::fmt;

/// A malformed chunk in a concatenated JSON stream.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    pub message: String,
    /// Byte offset just past the last value that decoded cleanly.
    pub offset: usize,
    /// True when the stream ended in the middle of a value.
    pub truncated: bool,
}

impl DecodeError {
    pub(crate) fn from_json(err: &serde_json::Error, offset: usize) -> Self {
        Self {
            message: err.to_string(),
            offset,
            truncated: err.is_eof(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.truncated {
            write!(f, "jsonbeat stream truncated after byte {}: {}", self.offset, self.message)
        } else {
            write!(f, "jsonbeat stream error after byte {}: {}", self.offset, self.message)
        }
    }
}

impl std::error::Error for DecodeError {}

/// A decoded stream that does not look like a single emitter run.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyError {
    Empty,
    /// Payload `index` is not a status object.
    NotAStatus { index: usize, message: String },
    StartChanged { index: usize, expected: u64, found: u64 },
    NestedMismatch { index: usize },
    NowDecreased { index: usize, previous: u64, found: u64 },
    TooFewPeriodic { expected_at_least: usize, found: usize },
    TooManyPeriodic { expected_at_most: usize, found: usize },
    /// `start` is too close to `u64::MAX` for the run to fit after it.
    StartOutOfRange { start: u64 },
    /// `now` of the first or last payload is outside its expected window.
    OutOfWindow { which: &'static str, expected: u64, found: u64, tolerance: u64 },
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::Empty => write!(f, "stream contains no payloads"),
            VerifyError::NotAStatus { index, message } => {
                write!(f, "payload {index} is not a status object: {message}")
            }
            VerifyError::StartChanged { index, expected, found } => {
                write!(f, "payload {index} has start {found}, expected {expected}")
            }
            VerifyError::NestedMismatch { index } => {
                write!(f, "payload {index} carries an unexpected nested fixture")
            }
            VerifyError::NowDecreased { index, previous, found } => {
                write!(f, "payload {index} went back in time: now {found} < {previous}")
            }
            VerifyError::TooFewPeriodic { expected_at_least, found } => {
                write!(f, "only {found} periodic payloads, expected at least {expected_at_least}")
            }
            VerifyError::TooManyPeriodic { expected_at_most, found } => {
                write!(f, "{found} periodic payloads, expected at most {expected_at_most}")
            }
            VerifyError::StartOutOfRange { start } => {
                write!(f, "start {start} leaves no room for a full run")
            }
            VerifyError::OutOfWindow { which, expected, found, tolerance } => write!(
                f,
                "{which} payload has now {found}, expected {expected} (+/- {tolerance} ms)"
            ),
        }
    }
}

impl std::error::Error for VerifyError {}

/// A query that cannot be turned into a selection, or input it cannot read.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// The query is not valid GraphQL.
    Query(String),
    /// A field carries an argument other than a boolean `entries`.
    Argument { field: String, argument: String },
    /// A single-document input is not valid JSON.
    Json(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::Query(message) => write!(f, "bad filter query: {message}"),
            FilterError::Argument { field, argument } => {
                write!(f, "invalid argument `{argument}` on field `{field}`")
            }
            FilterError::Json(message) => write!(f, "bad JSON input: {message}"),
        }
    }
}

impl std::error::Error for FilterError {}
