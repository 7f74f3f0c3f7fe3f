//! Rate governor: per-request delay from pool utilization.
//!
//! `delay = idle_workers / pool_size` time units. A busy pool fetches back to back; as workers
//! run out of work at the tail of a level the survivors slow down instead of bursting the API.

use std::thread;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct RateGovernor {
    pool_size: usize,
    unit: Duration,
}

impl RateGovernor {
    pub fn new(pool_size: usize, unit: Duration) -> Self {
        RateGovernor { pool_size, unit }
    }

    /// `idle / pool_size`, with `idle` capped at `pool_size`. Always within `[0, 1]`, which is
    /// inside `[0, pool_size]` for any non-empty pool. An empty pool never waits.
    pub fn delay_fraction(idle: usize, pool_size: usize) -> f64 {
        if pool_size == 0 {
            return 0.0;
        }
        idle.min(pool_size) as f64 / pool_size as f64
    }

    /// Delay to apply before the next fetch given the current idle count.
    pub fn delay(&self, idle: usize) -> Duration {
        self.unit
            .mul_f64(Self::delay_fraction(idle, self.pool_size))
    }

    /// Sleep for [`Self::delay`].
    pub fn pace(&self, idle: usize) {
        let d = self.delay(idle);
        if !d.is_zero() {
            thread::sleep(d);
        }
    }
}
