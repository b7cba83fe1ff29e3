//! Round scheduling.
//!
//! Two clocks: the normal polling interval, which always runs, and a short
//! aggressive interval that only counts while a failover is unconfirmed.
//! A round starts on whichever fires first.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

pub struct RoundTicker {
    normal: Interval,
    aggressive: Interval,
    was_aggressive: bool,
}

impl RoundTicker {
    /// Both clocks first fire one period from now.
    pub fn new(normal: Duration, aggressive: Duration) -> Self {
        let now = Instant::now();

        let mut normal_clock = time::interval_at(now + normal, normal);
        normal_clock.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut aggressive_clock = time::interval_at(now + aggressive, aggressive);
        aggressive_clock.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            normal: normal_clock,
            aggressive: aggressive_clock,
            was_aggressive: false,
        }
    }

    /// Wait for the next round.
    pub async fn tick(&mut self, aggressive: bool) {
        if aggressive && !self.was_aggressive {
            // Count a full short period from entering aggressive mode.
            self.aggressive.reset();
        }
        self.was_aggressive = aggressive;

        tokio::select! {
            _ = self.normal.tick() => {}
            _ = self.aggressive.tick(), if aggressive => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_about(elapsed: Duration, expected: Duration) {
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(5),
            "elapsed {:?}, expected {:?}",
            elapsed,
            expected
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_normal_interval() {
        let mut ticker = RoundTicker::new(Duration::from_secs(30), Duration::from_millis(100));

        let start = Instant::now();
        ticker.tick(false).await;
        assert_about(start.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_aggressive_interval() {
        let mut ticker = RoundTicker::new(Duration::from_secs(30), Duration::from_millis(100));

        ticker.tick(false).await;

        let start = Instant::now();
        ticker.tick(true).await;
        assert_about(start.elapsed(), Duration::from_millis(100));

        let start = Instant::now();
        ticker.tick(true).await;
        assert_about(start.elapsed(), Duration::from_millis(100));

        // Leaving aggressive mode falls back to the normal cadence.
        let start = Instant::now();
        ticker.tick(false).await;
        assert!(start.elapsed() > Duration::from_secs(29));
    }
}
