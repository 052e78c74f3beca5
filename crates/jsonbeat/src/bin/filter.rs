//! Filters a stream of JSON objects on stdin with a GraphQL selection.
//!
//! ```text
//! jsonbeat | jsonbeat-filter '{ now nested { thing } }'
//! ```
//!
//! Each filtered value is printed on its own line.

use std::env;
use std::io::{self, Write};

use anyhow::{Context, Result};
use jsonbeat_engine::logging::{init_logging, LoggingConfig};
use jsonbeat_wire::Filter;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let query = env::args()
        .nth(1)
        .context("usage: jsonbeat-filter '<graphql selection>'")?;
    let stdout = io::stdout();
    let count = filter_stream(&query, io::stdin().lock(), &mut stdout.lock())?;
    log::debug!("filtered {count} values");
    Ok(())
}

/// Writes each value of `reader`, filtered by `query`, as one line of `out`.
fn filter_stream<R: io::Read, W: Write>(query: &str, reader: R, out: &mut W) -> Result<usize> {
    let filter = Filter::parse(query).context("failed to parse filter query")?;
    let mut count = 0;
    for item in filter.apply_stream(reader) {
        let value = item.context("failed to decode input stream")?;
        writeln!(out, "{value}").context("failed to write to output")?;
        count += 1;
    }
    out.flush().context("failed to write to output")?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonbeat_wire::Template;

    fn emitted() -> String {
        let template = Template::new(1_000);
        [1_100, 1_200]
            .into_iter()
            .map(|now| serde_json::to_string(&template.status(now)).unwrap())
            .collect()
    }

    #[test]
    fn filters_emitted_stream_line_by_line() {
        let mut out = Vec::new();
        let count = filter_stream("{ now nested { thing } }", emitted().as_bytes(), &mut out).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"now\":1100,\"nested\":{\"thing\":\"something\"}}\n\
             {\"now\":1200,\"nested\":{\"thing\":\"something\"}}\n"
        );
    }

    #[test]
    fn bad_query_fails_before_reading() {
        let mut out = Vec::new();
        let err = filter_stream("{ now", emitted().as_bytes(), &mut out).unwrap_err();
        assert!(format!("{err:#}").starts_with("failed to parse filter query"));
        assert!(out.is_empty());
    }

    #[test]
    fn bad_argument_is_reported() {
        let mut out = Vec::new();
        let err = filter_stream("{ nested(depth: 2) }", emitted().as_bytes(), &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("invalid argument"));
    }

    #[test]
    fn malformed_input_stops_the_stream() {
        let mut src = emitted();
        src.push_str("oops");
        let mut out = Vec::new();
        let err = filter_stream("{ now }", src.as_bytes(), &mut out).unwrap_err();
        assert!(format!("{err:#}").starts_with("failed to decode input stream"));
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }
}
