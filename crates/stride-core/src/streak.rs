//! Streak derivation from a habit's daily log.
//!
//! The log is the source of truth; the counters on [`Habit`] are projections
//! of it. This module recomputes them so a caller can refresh the stored
//! counters after any log mutation (or repair them after an import).
//!
//! Day semantics over the habit's scheduled days:
//! - `Completed` extends the current run and counts toward totals;
//! - `Skipped` preserves the run without extending it;
//! - `Missed`, or a scheduled past day with no entry, resets the run;
//! - a scheduled *today* with no entry is pending, not a reset, so reading
//!   first thing in the morning does not zero a streak.

use time::Date;

use crate::model::{Habit, LogStatus};

/// Recomputed streak counters for one habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
    pub last_logged_on: Option<Date>,
    pub total_completions: u32,
}

/// Recompute streak counters from the habit's log as of `today`.
pub fn compute_streaks(habit: &Habit, today: Date) -> StreakSummary {
    let mut summary = StreakSummary {
        current: 0,
        longest: 0,
        last_logged_on: habit.log.iter().map(|e| e.date).max(),
        total_completions: habit
            .log
            .iter()
            .filter(|e| e.status == LogStatus::Completed)
            .count() as u32,
    };

    let Some(first) = habit.log.iter().map(|e| e.date).min() else {
        return summary;
    };
    if first > today {
        return summary;
    }

    let mut run = 0u32;
    let mut day = first;
    loop {
        if habit.is_scheduled_on(day) {
            match habit.entry_on(day).map(|e| e.status) {
                Some(LogStatus::Completed) => {
                    run += 1;
                    summary.longest = summary.longest.max(run);
                }
                Some(LogStatus::Skipped) => {}
                Some(LogStatus::Missed) => run = 0,
                None if day < today => run = 0,
                None => {} // today, still pending
            }
        }
        if day == today {
            break;
        }
        match day.next_day() {
            Some(next) => day = next,
            None => break,
        }
    }

    summary.current = run;
    summary
}

/// Recompute and write the derived counters back onto the habit.
pub fn refresh(habit: &mut Habit, today: Date) {
    let s = compute_streaks(habit, today);
    habit.current_streak = s.current;
    habit.longest_streak = s.longest;
    habit.last_logged_on = s.last_logged_on;
    habit.total_completions = s.total_completions;
}
