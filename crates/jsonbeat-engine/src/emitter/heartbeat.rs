use std::io::Write;
use std::time::Duration;

use anyhow::{bail, ensure, Context, Result};
use log::{debug, info, trace};
use serde_json::{Map, Value};
use tokio::time::{self, Instant, MissedTickBehavior};

use jsonbeat_wire::Template;

use super::chunk::Chunk;
use crate::time::EmitClock;

/// Emitter timing.
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Delay between periodic writes; also the delay before the first one.
    pub interval: Duration,
    /// Delay from startup to the final write.
    pub lifetime: Duration,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            lifetime: Duration::from_millis(10_000),
        }
    }
}

/// Lifecycle of a single run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EmitterState {
    /// Periodic timer active.
    Running,
    /// Timer cancelled, final write pending.
    Draining,
    Stopped,
}

/// What a completed run wrote.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub start_ms: u64,
    /// Writes issued by the periodic timer.
    pub periodic: u64,
    /// `now` of the final write.
    pub final_now_ms: u64,
}

/// Heartbeat emitter writing status objects to `W`.
///
/// `start` is captured once, when the emitter is built, and shared by every
/// payload. Each write is flushed before the next one is scheduled.
pub struct Emitter<W: Write> {
    config: EmitterConfig,
    clock: EmitClock,
    template: Template,
    out: W,
    state: EmitterState,
}

impl<W: Write> Emitter<W> {
    /// Builds an emitter anchored at the current wall-clock time.
    pub fn new(config: EmitterConfig, out: W) -> Result<Self> {
        let clock = EmitClock::start()?;
        Ok(Self::with_clock(config, clock, out))
    }

    pub fn with_clock(config: EmitterConfig, clock: EmitClock, out: W) -> Self {
        let template = Template::new(clock.start_ms());
        Self {
            config,
            clock,
            template,
            out,
            state: EmitterState::Running,
        }
    }

    pub fn start_ms(&self) -> u64 {
        self.template.start()
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    /// Returns the sink, consuming the emitter.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes one chunk: raw text verbatim, records merged onto the template
    /// and serialized as compact JSON. No newline is appended.
    pub fn write(&mut self, chunk: impl Into<Chunk>) -> Result<()> {
        match chunk.into() {
            Chunk::Raw(text) => self.write_bytes(text.as_bytes()),
            Chunk::Record(fields) => {
                let record = self.template.merge(fields);
                self.write_record(&record)
            }
        }
    }

    /// Runs the periodic loop until the lifetime elapses, then writes the
    /// final status and stops.
    ///
    /// A failed write also stops the emitter; it cannot be run again.
    pub async fn run(&mut self) -> Result<RunReport> {
        if self.state != EmitterState::Running {
            bail!("emitter already ran (state {:?})", self.state);
        }
        ensure!(!self.config.interval.is_zero(), "emitter interval must be non-zero");

        let result = self.drive().await;
        if result.is_err() {
            self.transition(EmitterState::Stopped);
        }
        result
    }

    async fn drive(&mut self) -> Result<RunReport> {
        let interval = self.config.interval;
        let origin = self.clock.origin();
        let mut ticker = time::interval_at(origin + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let deadline = time::sleep_until(origin + self.config.lifetime);
        tokio::pin!(deadline);

        debug!(
            "emitter running: start={} interval={:?} lifetime={:?}",
            self.start_ms(),
            interval,
            self.config.lifetime
        );

        let mut periodic = 0u64;
        loop {
            // A tick due at the same instant as the deadline is still written.
            tokio::select! {
                biased;
                scheduled = ticker.tick() => {
                    let now = self.write_status()?;
                    periodic += 1;
                    trace!(
                        "tick {periodic}: now={now} late={:?}",
                        Instant::now().saturating_duration_since(scheduled)
                    );
                }
                () = &mut deadline => break,
            }
        }

        drop(ticker);
        self.transition(EmitterState::Draining);

        let final_now_ms = self.write_status()?;
        self.transition(EmitterState::Stopped);

        let report = RunReport {
            start_ms: self.start_ms(),
            periodic,
            final_now_ms,
        };
        info!(
            "emitter stopped: {} periodic writes + final at +{}ms",
            report.periodic,
            report.final_now_ms.saturating_sub(report.start_ms)
        );
        Ok(report)
    }

    fn write_status(&mut self) -> Result<u64> {
        let now = self.clock.now_ms();
        let record = self.template.status(now);
        self.write_record(&record)?;
        Ok(now)
    }

    fn write_record(&mut self, record: &Map<String, Value>) -> Result<()> {
        let bytes = serde_json::to_vec(record).context("failed to serialize status record")?;
        self.write_bytes(&bytes)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.out
            .write_all(bytes)
            .and_then(|()| self.out.flush())
            .context("failed to write to output")
    }

    fn transition(&mut self, next: EmitterState) {
        debug!("emitter {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
