//! Fee computation for a parking stay

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Currency units charged per started hour
pub const DEFAULT_RATE_PER_HOUR: i64 = 10;

const MILLIS_PER_MINUTE: i64 = 60_000;
const MINUTES_PER_HOUR: i64 = 60;

/// Hourly tariff: every started hour is charged in full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tariff {
    pub rate_per_hour: i64,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            rate_per_hour: DEFAULT_RATE_PER_HOUR,
        }
    }
}

impl Tariff {
    pub fn new(rate_per_hour: i64) -> Self {
        Self { rate_per_hour }
    }

    /// Minutes between entry and exit, rounded up. Never negative.
    pub fn duration_minutes(&self, in_time: DateTime<Utc>, out_time: DateTime<Utc>) -> i64 {
        let elapsed_ms = (out_time - in_time).num_milliseconds();
        if elapsed_ms <= 0 {
            return 0;
        }
        ceil_div(elapsed_ms, MILLIS_PER_MINUTE)
    }

    /// Fee for a stay of the given length
    pub fn cost(&self, duration_minutes: i64) -> i64 {
        if duration_minutes <= 0 {
            return 0;
        }
        ceil_div(duration_minutes, MINUTES_PER_HOUR) * self.rate_per_hour
    }
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    (value + divisor - 1) / divisor
}
