use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

pub use chrono::Weekday;

// =============================================================================
// Time of Day
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn display_name(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// =============================================================================
// World Time
// =============================================================================

/// Simulated time as integer seconds since the Unix epoch.
///
/// The persistence contract wants a plain number in the save document, so
/// this wraps an `i64` transparently and borrows chrono only for calendar
/// math (weekday, hour) and display formatting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WorldTime(i64);

pub const MINUTE: i64 = 60;
pub const HOUR: i64 = 60 * MINUTE;
pub const DAY: i64 = 24 * HOUR;

impl WorldTime {
    pub fn from_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    pub fn seconds(&self) -> i64 {
        self.0
    }

    pub fn advanced_by(&self, seconds: i64) -> Self {
        Self(self.0 + seconds)
    }

    fn as_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }

    /// Current hour (0-23).
    pub fn hour(&self) -> u8 {
        self.as_datetime().hour() as u8
    }

    /// Current minute (0-59).
    pub fn minute(&self) -> u8 {
        self.as_datetime().minute() as u8
    }

    pub fn weekday(&self) -> Weekday {
        self.as_datetime().weekday()
    }

    /// Calendar day ordinal, used for "is this the same day" checks.
    pub fn day_number(&self) -> i64 {
        self.0.div_euclid(DAY)
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        match self.hour() {
            5..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            18..=21 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    /// How many interval boundaries lie between this time and `later`.
    ///
    /// Counts crossings, not elapsed intervals: jumping from one second
    /// before a boundary to one second after counts 1, and a jump spanning
    /// k boundaries counts k. Periodic effects (hunger accrual) use this
    /// so a single large time skip still applies the full cumulative
    /// effect.
    pub fn boundaries_crossed(&self, later: WorldTime, interval_seconds: i64) -> i64 {
        if interval_seconds <= 0 || later.0 <= self.0 {
            return 0;
        }
        later.0.div_euclid(interval_seconds) - self.0.div_euclid(interval_seconds)
    }

    pub fn display_time(&self) -> String {
        let hour = self.hour();
        let minute = self.minute();

        let period = if hour >= 12 { "PM" } else { "AM" };
        let display_hour = if hour == 0 {
            12
        } else if hour > 12 {
            hour - 12
        } else {
            hour
        };

        format!("{}:{:02} {}", display_hour, minute, period)
    }

    pub fn display_date(&self) -> String {
        let dt = self.as_datetime();
        format!(
            "{}, {} {}, {}",
            dt.weekday(),
            month_name(dt.month()),
            dt.day(),
            self.display_time()
        )
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-01 is a Monday; midnight UTC.
    const MONDAY_MIDNIGHT: i64 = 1_704_067_200;

    #[test]
    fn hour_and_weekday_from_epoch_seconds() {
        let t = WorldTime::from_seconds(MONDAY_MIDNIGHT + 9 * HOUR + 30 * MINUTE);
        assert_eq!(t.hour(), 9);
        assert_eq!(t.minute(), 30);
        assert_eq!(t.weekday(), Weekday::Mon);
        assert_eq!(t.time_of_day(), TimeOfDay::Morning);
    }

    #[test]
    fn time_of_day_mapping_is_standardized() {
        let base = WorldTime::from_seconds(MONDAY_MIDNIGHT);
        assert_eq!(base.advanced_by(5 * HOUR).time_of_day(), TimeOfDay::Morning);
        assert_eq!(
            base.advanced_by(12 * HOUR).time_of_day(),
            TimeOfDay::Afternoon
        );
        assert_eq!(
            base.advanced_by(18 * HOUR).time_of_day(),
            TimeOfDay::Evening
        );
        assert_eq!(base.advanced_by(3 * HOUR).time_of_day(), TimeOfDay::Night);
    }

    #[test]
    fn boundary_counting_counts_crossings_not_duration() {
        let before = WorldTime::from_seconds(HOUR - 1);
        // One second later, one boundary crossed.
        assert_eq!(before.boundaries_crossed(before.advanced_by(2), HOUR), 1);
        // A jump over three boundaries counts all three.
        assert_eq!(
            before.boundaries_crossed(before.advanced_by(3 * HOUR), HOUR),
            3
        );
        // No time passed, nothing crossed.
        assert_eq!(before.boundaries_crossed(before, HOUR), 0);
    }

    #[test]
    fn display_formats_are_human_readable() {
        let t = WorldTime::from_seconds(MONDAY_MIDNIGHT + 19 * HOUR + 5 * MINUTE);
        assert_eq!(t.display_time(), "7:05 PM");
        assert_eq!(t.display_date(), "Mon, January 1, 7:05 PM");
    }
}
