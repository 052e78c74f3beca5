use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tokio::time::Instant;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn epoch_ms() -> Result<u64> {
    let since = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is set before the Unix epoch")?;
    u64::try_from(since.as_millis()).context("system clock is out of range")
}

/// Emission clock anchored at startup.
///
/// The wall-clock reading is taken once, as `start_ms`. Later readings add the
/// monotonic time elapsed since that anchor, so `now_ms()` never decreases even
/// if the system clock is stepped while the emitter runs.
///
/// The anchor is a `tokio` instant, so paused test runtimes drive it too.
#[derive(Debug, Clone)]
pub struct EmitClock {
    start_ms: u64,
    origin: Instant,
}

impl EmitClock {
    /// Anchors a clock at the current wall-clock time.
    pub fn start() -> Result<Self> {
        Ok(Self::with_start(epoch_ms()?))
    }

    /// Anchors a clock at a fixed epoch timestamp.
    pub fn with_start(start_ms: u64) -> Self {
        Self {
            start_ms,
            origin: Instant::now(),
        }
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    /// Monotonic instant matching `start_ms`; timers are scheduled from here.
    pub fn origin(&self) -> Instant {
        self.origin
    }

    pub fn elapsed(&self) -> Duration {
        Instant::now().saturating_duration_since(self.origin)
    }

    pub fn now_ms(&self) -> u64 {
        let elapsed = u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.start_ms.saturating_add(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_after_2020() {
        assert!(epoch_ms().unwrap() > 1_577_836_800_000);
    }

    #[test]
    fn start_reads_wall_clock() {
        let before = epoch_ms().unwrap();
        let clock = EmitClock::start().unwrap();
        assert!(clock.start_ms() >= before);
        assert!(clock.now_ms() >= clock.start_ms());
    }

    #[tokio::test(start_paused = true)]
    async fn now_follows_elapsed_time() {
        let clock = EmitClock::with_start(5_000);
        assert_eq!(clock.now_ms(), 5_000);

        tokio::time::advance(Duration::from_millis(250)).await;
        assert_eq!(clock.elapsed(), Duration::from_millis(250));
        assert_eq!(clock.now_ms(), 5_250);
    }

    #[tokio::test(start_paused = true)]
    async fn now_never_decreases() {
        let clock = EmitClock::with_start(0);
        let mut last = clock.now_ms();
        for _ in 0..20 {
            tokio::time::advance(Duration::from_millis(7)).await;
            let now = clock.now_ms();
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, 140);
    }
}
