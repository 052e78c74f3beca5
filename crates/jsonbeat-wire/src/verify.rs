//! Checks a decoded stream against the shape of a single emitter run.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::VerifyError;
use crate::payload::{Nested, StatusPayload};

/// What a well-behaved run looks like.
#[derive(Debug, Clone)]
pub struct Expectations {
    /// Period between periodic payloads, in ms.
    pub interval_ms: u64,
    /// Delay from `start` to the final payload, in ms.
    pub lifetime_ms: u64,
    /// Lower bound on periodic payloads (scheduler jitter eats some ticks).
    pub min_periodic: usize,
    /// Allowed drift of the first and last `now` from their nominal values.
    pub tolerance_ms: u64,
}

impl Default for Expectations {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            lifetime_ms: 10_000,
            min_periodic: 90,
            tolerance_ms: 250,
        }
    }
}

impl Expectations {
    fn max_periodic(&self) -> usize {
        (self.lifetime_ms / self.interval_ms.max(1)) as usize
    }
}

/// Outcome of a successful verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub payloads: usize,
    /// Payloads before the final one.
    pub periodic: usize,
    pub start: u64,
    pub first_now: u64,
    pub last_now: u64,
}

impl fmt::Display for StreamSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ok: {} payloads ({} periodic + final), start={}, first=+{}ms, last=+{}ms",
            self.payloads,
            self.periodic,
            self.start,
            self.first_now.saturating_sub(self.start),
            self.last_now.saturating_sub(self.start),
        )
    }
}

/// Verify a full run: every value is a status payload, `start` and `nested`
/// never change, `now` never decreases, and the count and first/last
/// timestamps fit `expect`. The last value is taken to be the final emission.
pub fn verify(values: &[Value], expect: &Expectations) -> Result<StreamSummary, VerifyError> {
    let payloads = values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            StatusPayload::deserialize(value).map_err(|err| VerifyError::NotAStatus {
                index,
                message: err.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (first, last) = match (payloads.first(), payloads.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(VerifyError::Empty),
    };

    let fixture = Nested::fixture();
    let mut previous = first.now;
    for (index, payload) in payloads.iter().enumerate() {
        if payload.start != first.start {
            return Err(VerifyError::StartChanged {
                index,
                expected: first.start,
                found: payload.start,
            });
        }
        if payload.nested != fixture {
            return Err(VerifyError::NestedMismatch { index });
        }
        if payload.now < previous {
            return Err(VerifyError::NowDecreased {
                index,
                previous,
                found: payload.now,
            });
        }
        previous = payload.now;
    }

    let periodic = payloads.len() - 1;
    if periodic < expect.min_periodic {
        return Err(VerifyError::TooFewPeriodic {
            expected_at_least: expect.min_periodic,
            found: periodic,
        });
    }
    if periodic > expect.max_periodic() {
        return Err(VerifyError::TooManyPeriodic {
            expected_at_most: expect.max_periodic(),
            found: periodic,
        });
    }

    let (Some(first_due), Some(last_due)) = (
        first.start.checked_add(expect.interval_ms),
        first.start.checked_add(expect.lifetime_ms),
    ) else {
        return Err(VerifyError::StartOutOfRange { start: first.start });
    };

    // A run with no periodic payloads only has a final one to place.
    if periodic > 0 {
        check_window("first", first_due, first.now, expect.tolerance_ms)?;
    }
    check_window("last", last_due, last.now, expect.tolerance_ms)?;

    Ok(StreamSummary {
        payloads: payloads.len(),
        periodic,
        start: first.start,
        first_now: first.now,
        last_now: last.now,
    })
}

fn check_window(which: &'static str, expected: u64, found: u64, tolerance: u64) -> Result<(), VerifyError> {
    if expected.abs_diff(found) > tolerance {
        return Err(VerifyError::OutOfWindow { which, expected, found, tolerance });
    }
    Ok(())
}
