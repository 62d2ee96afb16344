use std::fmt;

use chrono::{DateTime, Utc};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// How far away a deadline is, in whole days rounded up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineProximity {
    Today,
    Tomorrow,
    InDays(i64),
}

impl DeadlineProximity {
    /// `None` once the deadline has passed
    pub fn between(now: DateTime<Utc>, deadline: DateTime<Utc>) -> Option<Self> {
        let remaining = deadline.signed_duration_since(now).num_milliseconds();
        if remaining < 0 {
            return None;
        }
        // ceiling division, remaining is non-negative here
        match (remaining + DAY_MS - 1) / DAY_MS {
            0 => Some(Self::Today),
            1 => Some(Self::Tomorrow),
            days => Some(Self::InDays(days)),
        }
    }
}

impl fmt::Display for DeadlineProximity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => f.write_str("today"),
            Self::Tomorrow => f.write_str("tomorrow"),
            Self::InDays(days) => write!(f, "in {} days", days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_deadline_now_is_today() {
        assert_eq!(DeadlineProximity::between(now(), now()), Some(DeadlineProximity::Today));
    }

    #[test]
    fn test_one_day_out_is_tomorrow() {
        let deadline = now() + Duration::hours(24);
        assert_eq!(
            DeadlineProximity::between(now(), deadline),
            Some(DeadlineProximity::Tomorrow)
        );
    }

    #[test]
    fn test_partial_days_round_up() {
        let deadline = now() + Duration::hours(49);
        let proximity = DeadlineProximity::between(now(), deadline).unwrap();
        assert_eq!(proximity, DeadlineProximity::InDays(3));
        assert_eq!(proximity.to_string(), "in 3 days");
    }

    #[test]
    fn test_past_deadline_suppressed() {
        let deadline = now() - Duration::milliseconds(1);
        assert_eq!(DeadlineProximity::between(now(), deadline), None);
    }
}
