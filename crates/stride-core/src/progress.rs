//! Progress aggregation.
//!
//! Derives a single 0–100 completion percentage for a goal from its weighted
//! composition. Read-only and side-effect-free: progress is a projection of
//! current entity state, recomputed on every read. It is never stored as a
//! source of truth, and it cannot be cached indefinitely because habit
//! eligibility moves with the clock.
//!
//! Contribution ratios per item, each in [0,1]:
//! - inline sub-goal: 1 when checked, else 0;
//! - linked goal: its own *integer percent* divided by 100, so rounding
//!   happens at every level of the hierarchy; resolution is recursive with a
//!   per-call memo (a goal linked from several places is computed once) and
//!   an in-flight set that yields 0 for any residual cycle instead of
//!   looping;
//! - habit link: completed scheduled days over elapsed scheduled days in the
//!   window from max(goal creation, link start) to min(today, link end);
//!   zero elapsed scheduled days contribute 0.
//!
//! A manually completed goal always reports 100 regardless of its items,
//! matching the rule that composition freezes at completion.

use std::collections::{HashMap, HashSet};

use time::Date;

use crate::errors::{EngineError, EngineResult};
use crate::model::{Goal, GoalId, Habit, HabitLink, ItemRef, LogStatus, SubGoalKind};
use crate::store::{GoalStore, HabitStore};

/// Compute a goal's progress percent as of `today`.
pub fn compute_progress<G, H>(goal: &Goal, goals: &G, habits: &H, today: Date) -> EngineResult<u8>
where
    G: GoalStore,
    H: HabitStore,
{
    let mut memo: HashMap<GoalId, f64> = HashMap::new();
    let mut in_flight: HashSet<GoalId> = HashSet::new();
    let ratio = goal_ratio(goal, goals, habits, today, &mut memo, &mut in_flight)?;
    Ok(to_percent(ratio))
}

fn to_percent(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

fn goal_ratio<G, H>(
    goal: &Goal,
    goals: &G,
    habits: &H,
    today: Date,
    memo: &mut HashMap<GoalId, f64>,
    in_flight: &mut HashSet<GoalId>,
) -> EngineResult<f64>
where
    G: GoalStore,
    H: HabitStore,
{
    if goal.completed {
        return Ok(1.0);
    }
    if goal.is_leaf() {
        return Ok(0.0);
    }

    in_flight.insert(goal.id);

    let mut acc = 0.0f64;
    for link in &goal.sub_goals {
        let ratio = match &link.kind {
            SubGoalKind::Inline { completed, .. } => {
                if *completed {
                    1.0
                } else {
                    0.0
                }
            }
            SubGoalKind::Linked { goal_id } => {
                linked_ratio(*goal_id, goals, habits, today, memo, in_flight)?
            }
        };
        acc += ratio * link.weight as f64;
    }

    for link in &goal.habit_links {
        let habit = habits
            .habit(link.habit_id)
            .ok_or(EngineError::UnknownReference {
                id: ItemRef::Habit(link.habit_id),
            })?;
        acc += habit_ratio(goal.created_at.date(), link, &habit, today) * link.weight as f64;
    }

    in_flight.remove(&goal.id);

    Ok((acc / 100.0).clamp(0.0, 1.0))
}

fn linked_ratio<G, H>(
    id: GoalId,
    goals: &G,
    habits: &H,
    today: Date,
    memo: &mut HashMap<GoalId, f64>,
    in_flight: &mut HashSet<GoalId>,
) -> EngineResult<f64>
where
    G: GoalStore,
    H: HabitStore,
{
    if let Some(&ratio) = memo.get(&id) {
        return Ok(ratio);
    }
    // Residual cycle (invariant 3 violated by a race): contribute nothing
    // rather than recurse forever.
    if in_flight.contains(&id) {
        return Ok(0.0);
    }

    let linked = goals.goal(id).ok_or(EngineError::UnknownReference {
        id: ItemRef::Goal(id),
    })?;
    let ratio = goal_ratio(&linked, goals, habits, today, memo, in_flight)?;
    // A linked goal contributes its reported integer percent, not the raw
    // ratio: rounding applies at every level of the hierarchy.
    let reported = to_percent(ratio) as f64 / 100.0;
    memo.insert(id, reported);
    Ok(reported)
}

/// Ratio of completed scheduled days to elapsed scheduled days in the link's
/// progress window.
fn habit_ratio(goal_created: Date, link: &HabitLink, habit: &Habit, today: Date) -> f64 {
    let start = link.start_date.map_or(goal_created, |s| s.max(goal_created));
    let end = link.end_date.map_or(today, |e| e.min(today));
    if end < start {
        return 0.0;
    }

    let mut eligible = 0u32;
    let mut done = 0u32;
    let mut day = start;
    loop {
        if habit.is_scheduled_on(day) {
            eligible += 1;
            if habit.entry_on(day).map(|e| e.status) == Some(LogStatus::Completed) {
                done += 1;
            }
        }
        if day == end {
            break;
        }
        match day.next_day() {
            Some(next) => day = next,
            None => break,
        }
    }

    if eligible == 0 {
        0.0
    } else {
        (done as f64 / eligible as f64).clamp(0.0, 1.0)
    }
}
