//! Reads a jsonbeat stream from stdin and checks it describes one full run.
//!
//! ```text
//! jsonbeat | jsonbeat-check
//! ```

use std::io::{self, Write};

use anyhow::{Context, Result};
use jsonbeat_engine::logging::{init_logging, LoggingConfig};
use jsonbeat_wire::{verify, Decoder, Expectations, StreamSummary};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let stdout = io::stdout();
    check(io::stdin().lock(), &Expectations::default(), &mut stdout.lock())?;
    Ok(())
}

/// Decodes and verifies the whole of `reader`, then writes the summary line.
fn check<R: io::Read, W: Write>(reader: R, expect: &Expectations, out: &mut W) -> Result<StreamSummary> {
    let mut values = Vec::new();
    for item in Decoder::new(reader) {
        values.push(item.context("failed to decode jsonbeat stream")?);
        log::trace!("decoded payload {}", values.len());
    }
    log::debug!("decoded {} payloads", values.len());

    let summary = verify(&values, expect).context("jsonbeat stream failed verification")?;
    writeln!(out, "{summary}").context("failed to write summary")?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonbeat_wire::Template;

    fn stream(start: u64, nows: impl IntoIterator<Item = u64>) -> String {
        let template = Template::new(start);
        nows.into_iter()
            .map(|now| serde_json::to_string(&template.status(now)).unwrap())
            .collect()
    }

    fn nominal() -> String {
        stream(1_000, (1..=100).map(|i| 1_000 + i * 100).chain([11_000]))
    }

    #[test]
    fn prints_summary_for_full_run() {
        let mut out = Vec::new();
        let summary = check(nominal().as_bytes(), &Expectations::default(), &mut out).unwrap();
        assert_eq!(summary.periodic, 100);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ok: 101 payloads (100 periodic + final), start=1000, first=+100ms, last=+10000ms\n"
        );
    }

    #[test]
    fn truncated_stream_is_a_decode_error() {
        let mut src = nominal();
        src.truncate(src.len() - 3);
        let mut out = Vec::new();
        let err = check(src.as_bytes(), &Expectations::default(), &mut out).unwrap_err();
        assert!(format!("{err:#}").starts_with("failed to decode jsonbeat stream"));
        assert!(out.is_empty());
    }

    #[test]
    fn short_stream_fails_verification() {
        let src = stream(0, [100, 200, 10_000]);
        let mut out = Vec::new();
        let err = check(src.as_bytes(), &Expectations::default(), &mut out).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("jsonbeat stream failed verification"));
        assert!(message.contains("only 2 periodic payloads"));
        assert!(out.is_empty());
    }
}
