//! Which calendar day counts as "today"
//!
//! Every date comparison on the dashboard goes through one [`TodayPolicy`]:
//! the machine's local timezone unless an IANA zone is configured.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::fmt;

use super::types::LastUsed;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TodayPolicy {
    #[default]
    Local,
    Zone(Tz),
}

impl TodayPolicy {
    /// Parse an IANA timezone name such as `Europe/Warsaw`
    pub fn parse(name: &str) -> Result<Self> {
        name.trim()
            .parse::<Tz>()
            .map(TodayPolicy::Zone)
            .map_err(|_| anyhow!("Unknown timezone '{}'", name))
    }

    /// Wall-clock time of an instant in the policy zone
    pub fn wall_time(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            TodayPolicy::Local => instant.with_timezone(&Local).naive_local(),
            TodayPolicy::Zone(tz) => instant.with_timezone(tz).naive_local(),
        }
    }

    /// Calendar date of an instant in the policy zone
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.wall_time(instant).date()
    }

    /// Wall-clock time of a last-used value, if it has one
    pub fn last_used_wall_time(&self, last_used: &LastUsed) -> Option<NaiveDateTime> {
        match last_used {
            LastUsed::At(dt) => Some(self.wall_time(dt.with_timezone(&Utc))),
            LastUsed::Local(naive) => Some(*naive),
            LastUsed::Never | LastUsed::Unknown(_) => None,
        }
    }
}

impl fmt::Display for TodayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodayPolicy::Local => write!(f, "local"),
            TodayPolicy::Zone(tz) => write!(f, "{}", tz.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, h, m, 0).unwrap()
    }

    #[test]
    fn parse_known_zone() {
        let policy = TodayPolicy::parse("Europe/Warsaw").unwrap();
        assert_eq!(policy, TodayPolicy::Zone(chrono_tz::Europe::Warsaw));
        assert_eq!(policy.to_string(), "Europe/Warsaw");
    }

    #[test]
    fn parse_unknown_zone_fails() {
        let err = TodayPolicy::parse("Mars/Olympus").unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn local_displays_as_local() {
        assert_eq!(TodayPolicy::Local.to_string(), "local");
    }

    #[test]
    fn zone_shifts_date_across_midnight() {
        // 23:30 UTC is already the next day in Tokyo
        let tokyo = TodayPolicy::Zone(chrono_tz::Asia::Tokyo);
        let utc_zone = TodayPolicy::Zone(chrono_tz::UTC);
        let instant = utc(23, 30);

        assert_eq!(
            utc_zone.date_of(instant),
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
        );
        assert_eq!(
            tokyo.date_of(instant),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
    }

    #[test]
    fn aware_last_used_converted_to_zone() {
        let policy = TodayPolicy::Zone(chrono_tz::Europe::Warsaw);
        let last_used = LastUsed::parse("2026-10-18T10:00:00Z");
        let wall = policy.last_used_wall_time(&last_used).unwrap();
        // CEST is UTC+2 in October before the switch
        assert_eq!(wall.hour(), 12);
    }

    #[test]
    fn naive_last_used_taken_as_is() {
        let policy = TodayPolicy::Zone(chrono_tz::Asia::Tokyo);
        let last_used = LastUsed::parse("2026-10-18T10:00:00");
        let wall = policy.last_used_wall_time(&last_used).unwrap();
        assert_eq!(wall.hour(), 10);
    }

    #[test]
    fn never_and_unknown_have_no_time() {
        let policy = TodayPolicy::default();
        assert!(policy.last_used_wall_time(&LastUsed::Never).is_none());
        assert!(policy
            .last_used_wall_time(&LastUsed::Unknown("x".into()))
            .is_none());
    }
}
