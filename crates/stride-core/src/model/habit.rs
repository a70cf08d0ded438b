//! Habit and habit-log models.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Weekday};

use super::{HabitId, UserId};

/// How often a habit is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Custom,
}

/// Day of week, Sunday-based (0..=6) as stored by the product.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub fn from_index(i: u8) -> Option<Self> {
        match i {
            0 => Some(Self::Sunday),
            1 => Some(Self::Monday),
            2 => Some(Self::Tuesday),
            3 => Some(Self::Wednesday),
            4 => Some(Self::Thursday),
            5 => Some(Self::Friday),
            6 => Some(Self::Saturday),
            _ => None,
        }
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn from_weekday(w: Weekday) -> Self {
        match w {
            Weekday::Sunday => Self::Sunday,
            Weekday::Monday => Self::Monday,
            Weekday::Tuesday => Self::Tuesday,
            Weekday::Wednesday => Self::Wednesday,
            Weekday::Thursday => Self::Thursday,
            Weekday::Friday => Self::Friday,
            Weekday::Saturday => Self::Saturday,
        }
    }

    /// The day of week `date` falls on.
    pub fn of(date: Date) -> Self {
        Self::from_weekday(date.weekday())
    }
}

/// Status of a single logged day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Completed,
    Skipped,
    Missed,
}

/// One entry in a habit's chronological daily log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitLogEntry {
    /// Date-only key in the habit's timezone.
    pub date: Date,
    pub status: LogStatus,
    pub note: Option<String>,
    pub mood: Option<String>,
}

impl HabitLogEntry {
    pub fn new(date: Date, status: LogStatus) -> Self {
        Self {
            date,
            status,
            note: None,
            mood: None,
        }
    }
}

/// A recurring habit with its owned daily log.
///
/// Streak fields are derived counters maintained by the streak tracker; the
/// log is the source of truth and the counters are recomputable from it at
/// any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub owner: UserId,
    pub name: String,
    pub frequency: Frequency,
    /// Scheduled weekdays; required when `frequency` is not daily.
    pub days_of_week: Option<BTreeSet<DayOfWeek>>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_logged_on: Option<Date>,
    pub total_completions: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Reference event for the completion lock: creation, then the previous
    /// completion for recurring habits.
    #[serde(with = "time::serde::rfc3339")]
    pub cooldown_started_at: OffsetDateTime,
    pub is_active: bool,
    pub is_archived: bool,
    pub log: Vec<HabitLogEntry>,
}

impl Habit {
    /// Create a fresh daily habit owned by `owner`.
    pub fn new(owner: UserId, name: impl Into<String>, created_at: OffsetDateTime) -> Self {
        Self {
            id: HabitId::new(),
            owner,
            name: name.into(),
            frequency: Frequency::Daily,
            days_of_week: None,
            current_streak: 0,
            longest_streak: 0,
            last_logged_on: None,
            total_completions: 0,
            created_at,
            cooldown_started_at: created_at,
            is_active: true,
            is_archived: false,
            log: Vec::new(),
        }
    }

    /// True when the habit still schedules at all: not archived and active.
    /// Archiving preserves the log and the stored counters but stops all
    /// scheduling and streak updates.
    pub fn is_schedulable(&self) -> bool {
        self.is_active && !self.is_archived
    }

    /// True when `date` falls on one of the habit's scheduled days. Always
    /// false for an archived or deactivated habit.
    pub fn is_scheduled_on(&self, date: Date) -> bool {
        if !self.is_schedulable() {
            return false;
        }
        match self.frequency {
            Frequency::Daily => true,
            Frequency::Weekly | Frequency::Custom => self
                .days_of_week
                .as_ref()
                .is_some_and(|days| days.contains(&DayOfWeek::of(date))),
        }
    }

    /// Log entry for a given date, if one exists.
    pub fn entry_on(&self, date: Date) -> Option<&HabitLogEntry> {
        self.log.iter().find(|e| e.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn habit() -> Habit {
        Habit::new(UserId::new(), "morning run", datetime!(2026-01-01 06:00 UTC))
    }

    #[test]
    fn daily_habit_is_scheduled_every_day() {
        let h = habit();
        assert!(h.is_scheduled_on(date!(2026 - 01 - 05)));
        assert!(h.is_scheduled_on(date!(2026 - 01 - 06)));
    }

    #[test]
    fn weekly_habit_uses_days_of_week() {
        let mut h = habit();
        h.frequency = Frequency::Weekly;
        h.days_of_week = Some(BTreeSet::from([DayOfWeek::Monday]));

        // 2026-01-05 is a Monday.
        assert!(h.is_scheduled_on(date!(2026 - 01 - 05)));
        assert!(!h.is_scheduled_on(date!(2026 - 01 - 06)));
    }

    #[test]
    fn non_daily_without_days_is_never_scheduled() {
        let mut h = habit();
        h.frequency = Frequency::Custom;
        h.days_of_week = None;
        assert!(!h.is_scheduled_on(date!(2026 - 01 - 05)));
    }

    #[test]
    fn archived_or_inactive_habit_never_schedules() {
        let mut h = habit();
        h.is_archived = true;
        assert!(!h.is_schedulable());
        assert!(!h.is_scheduled_on(date!(2026 - 01 - 05)));

        let mut h = habit();
        h.is_active = false;
        assert!(!h.is_scheduled_on(date!(2026 - 01 - 05)));
    }

    #[test]
    fn day_of_week_index_round_trip() {
        for i in 0..7u8 {
            assert_eq!(DayOfWeek::from_index(i).unwrap().index(), i);
        }
        assert!(DayOfWeek::from_index(7).is_none());
    }
}
