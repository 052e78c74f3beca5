use std::io::Write;

use anyhow::{Context, Result};

use crate::emitter::{Emitter, EmitterConfig, RunReport};

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs one emitter to completion on a current-thread runtime, writing to
    /// `out`. Returns once the final write is flushed.
    pub fn run<W: Write>(config: EmitterConfig, out: W) -> Result<RunReport> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .context("failed to create tokio runtime")?;

        runtime
            .block_on(async move {
                let mut emitter = Emitter::new(config, out)?;
                emitter.run().await
            })
            .context("emitter loop terminated with error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use jsonbeat_wire::{decode_str, verify, Expectations};

    #[test]
    fn short_run_on_real_clock() {
        let config = EmitterConfig {
            interval: Duration::from_millis(20),
            lifetime: Duration::from_millis(200),
        };
        let mut out = Vec::new();
        let report = Runtime::run(config, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let values = decode_str(&text).unwrap();
        assert_eq!(values.len() as u64, report.periodic + 1);

        let expect = Expectations {
            interval_ms: 20,
            lifetime_ms: 200,
            min_periodic: 5,
            tolerance_ms: 100,
        };
        let summary = verify(&values, &expect).unwrap();
        assert_eq!(summary.start, report.start_ms);
        assert_eq!(summary.last_now, report.final_now_ms);
    }
}
