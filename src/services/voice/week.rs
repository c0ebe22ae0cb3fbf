use std::fmt;

use chrono::{DateTime, Datelike, Utc};

/// An ISO-8601 calendar week. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    pub fn of(at: DateTime<Utc>) -> Self {
        let iso = at.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_iso_year_boundaries() {
        // Sunday 3 Jan 2021 still belongs to 2020's last week
        assert_eq!(WeekKey::of(at(2021, 1, 3)), WeekKey { year: 2020, week: 53 });
        // Monday 30 Dec 2024 already belongs to 2025
        assert_eq!(WeekKey::of(at(2024, 12, 30)), WeekKey { year: 2025, week: 1 });
    }

    #[test]
    fn test_week_changes_on_monday() {
        let sunday = WeekKey::of(Utc.with_ymd_and_hms(2026, 10, 18, 23, 59, 59).unwrap());
        let monday = WeekKey::of(Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap());
        assert_ne!(sunday, monday);
        assert!(sunday < monday);
    }

    #[test]
    fn test_ordering_across_years() {
        assert!(WeekKey { year: 2025, week: 52 } < WeekKey { year: 2026, week: 1 });
    }

    #[test]
    fn test_display() {
        assert_eq!(WeekKey { year: 2026, week: 3 }.to_string(), "2026-W03");
    }
}
