use std::io;

use anyhow::Result;
use jsonbeat_engine::emitter::EmitterConfig;
use jsonbeat_engine::logging::{init_logging, LoggingConfig};
use jsonbeat_engine::runtime::Runtime;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    // Payloads own stdout; the report only goes to the log.
    let report = Runtime::run(EmitterConfig::default(), io::stdout())?;
    log::info!(
        "done: start={} periodic={} final_now={}",
        report.start_ms,
        report.periodic,
        report.final_now_ms
    );
    Ok(())
}
