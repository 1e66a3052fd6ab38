//! NPC state and weekly schedules
//!
//! An NPC instance is created lazily on first reference and never
//! destroyed, only relocated. Its immutable template (description,
//! schedule, dialogue scripts) lives in the engine registry; the instance
//! here carries only mutable per-playthrough data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game_time::{Weekday, WorldTime};
use crate::ids::{LocationId, NpcId};

/// A temporary placement that beats the schedule until it expires,
/// e.g. an NPC relocated for a timed encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationOverride {
    pub location: LocationId,
    /// Epoch seconds after which the schedule takes over again.
    pub until: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub template: NpcId,
    /// Whether story text may reveal this character's proper name.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub known: bool,
    /// None means offscreen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stats: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_override: Option<LocationOverride>,
}

impl Npc {
    pub fn new(template: NpcId) -> Self {
        Self {
            template,
            known: false,
            location: None,
            stats: BTreeMap::new(),
            location_override: None,
        }
    }

    pub fn stat(&self, name: &str) -> i64 {
        self.stats.get(name).copied().unwrap_or(0)
    }

    pub fn override_active_at(&self, time: WorldTime) -> bool {
        self.location_override
            .as_ref()
            .is_some_and(|o| o.until > time.seconds())
    }
}

// =============================================================================
// Schedules
// =============================================================================

/// One rule in a weekly schedule: an hour range at a location, optionally
/// restricted to certain days. An empty `days` list means every day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub start_hour: u8,
    pub end_hour: u8,
    pub location: LocationId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<Weekday>,
}

impl ScheduleEntry {
    pub fn new(start_hour: u8, end_hour: u8, location: impl Into<LocationId>) -> Self {
        Self {
            start_hour,
            end_hour,
            location: location.into(),
            days: Vec::new(),
        }
    }

    pub fn on_days(mut self, days: Vec<Weekday>) -> Self {
        self.days = days;
        self
    }

    /// Whether `hour` falls inside [start, end). Ranges may wrap past
    /// midnight: 22-2 covers 22, 23, 0, and 1.
    fn contains_hour(&self, hour: u8) -> bool {
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }

    fn matches(&self, time: WorldTime) -> bool {
        if !self.days.is_empty() && !self.days.contains(&time.weekday()) {
            return false;
        }
        self.contains_hour(time.hour())
    }
}

/// Priority-ordered weekly schedule: the first matching entry wins, and
/// no match leaves the NPC offscreen.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schedule(pub Vec<ScheduleEntry>);

impl Schedule {
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        Self(entries)
    }

    pub fn resolve(&self, time: WorldTime) -> Option<LocationId> {
        self.0
            .iter()
            .find(|entry| entry.matches(time))
            .map(|entry| entry.location.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_time::HOUR;

    // 2024-01-01 (Monday) 00:00 UTC
    const MONDAY: i64 = 1_704_067_200;

    fn at(day_offset: i64, hour: i64) -> WorldTime {
        WorldTime::from_seconds(MONDAY + day_offset * 24 * HOUR + hour * HOUR)
    }

    fn gym_and_home() -> Schedule {
        Schedule::new(vec![
            ScheduleEntry::new(9, 12, "gym").on_days(vec![Weekday::Mon, Weekday::Wed]),
            ScheduleEntry::new(8, 17, "office"),
            ScheduleEntry::new(22, 2, "nightclub"),
        ])
    }

    #[test]
    fn first_matching_entry_wins() {
        let schedule = gym_and_home();
        // Monday 10:00 - the gym entry precedes the office entry.
        assert_eq!(schedule.resolve(at(0, 10)), Some(LocationId::new("gym")));
        // Tuesday 10:00 - gym entry is day-constrained away.
        assert_eq!(schedule.resolve(at(1, 10)), Some(LocationId::new("office")));
    }

    #[test]
    fn no_match_means_offscreen() {
        let schedule = gym_and_home();
        assert_eq!(schedule.resolve(at(0, 5)), None);
    }

    #[test]
    fn ranges_wrap_past_midnight() {
        let schedule = gym_and_home();
        assert_eq!(
            schedule.resolve(at(0, 23)),
            Some(LocationId::new("nightclub"))
        );
        assert_eq!(
            schedule.resolve(at(1, 1)),
            Some(LocationId::new("nightclub"))
        );
        assert_eq!(schedule.resolve(at(1, 2)), None);
    }

    #[test]
    fn override_active_until_expiry() {
        let mut npc = Npc::new(NpcId::new("emma"));
        npc.location_override = Some(LocationOverride {
            location: LocationId::new("park"),
            until: MONDAY + 2 * HOUR,
        });
        assert!(npc.override_active_at(at(0, 1)));
        assert!(!npc.override_active_at(at(0, 2)));
    }
}
