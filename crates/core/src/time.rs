use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

//
// ─── TIME LIMIT ────────────────────────────────────────────────────────────────
//

/// Unit a quiz source reports its time limit in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Minutes,
    Seconds,
}

impl std::str::FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "min" | "mins" | "minutes" => Ok(Self::Minutes),
            "s" | "sec" | "secs" | "seconds" => Ok(Self::Seconds),
            other => Err(format!("unknown time unit: {other}")),
        }
    }
}

/// Attempt time limit, always stored in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeLimit(u32);

impl TimeLimit {
    #[must_use]
    pub fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    #[must_use]
    pub fn from_mins(mins: u32) -> Self {
        Self(mins.saturating_mul(60))
    }

    /// Normalize a raw value reported by a quiz source.
    #[must_use]
    pub fn from_raw(value: u32, unit: TimeUnit) -> Self {
        match unit {
            TimeUnit::Minutes => Self::from_mins(value),
            TimeUnit::Seconds => Self::from_secs(value),
        }
    }

    #[must_use]
    pub fn as_secs(self) -> u32 {
        self.0
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_are_normalized_to_seconds() {
        assert_eq!(TimeLimit::from_raw(10, TimeUnit::Minutes).as_secs(), 600);
        assert_eq!(TimeLimit::from_raw(600, TimeUnit::Seconds).as_secs(), 600);
    }

    #[test]
    fn huge_minute_values_saturate() {
        assert_eq!(TimeLimit::from_mins(u32::MAX).as_secs(), u32::MAX);
    }

    #[test]
    fn time_unit_parses_common_spellings() {
        assert_eq!("Minutes".parse::<TimeUnit>(), Ok(TimeUnit::Minutes));
        assert_eq!("secs".parse::<TimeUnit>(), Ok(TimeUnit::Seconds));
        assert!("hours".parse::<TimeUnit>().is_err());
    }

    #[test]
    fn fixed_clock_does_not_move() {
        let clock = fixed_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().timestamp(), FIXED_TEST_TIMESTAMP);
    }
}
