//! Dependency tracking for sub-goal and habit removal.
//!
//! Before a habit or goal is deleted, the caller asks which non-completed
//! goals reference it and surfaces those parents for confirmation. At actual
//! deletion time the tracker produces, per affected parent, a replacement
//! composition with the referencing items removed and the freed weight
//! redistributed among the survivors in proportion to their current weights.
//!
//! Patch production is pure: every patch is computed before any is returned,
//! so the caller either persists the whole set or none of it.

use serde::Serialize;

use crate::model::{Goal, GoalId, HabitLink, ItemRef, SubGoalLink};
use crate::weights::normalize;

/// A parent goal that references the item being removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependentGoal {
    pub goal_id: GoalId,
    pub title: String,
}

/// Replacement composition for one affected parent goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalCompositionPatch {
    pub goal_id: GoalId,
    pub sub_goals: Vec<SubGoalLink>,
    pub habit_links: Vec<HabitLink>,
}

/// Non-completed goals whose composition references `item`.
pub fn find_dependents<'a>(
    item: ItemRef,
    goals: impl IntoIterator<Item = &'a Goal>,
) -> Vec<DependentGoal> {
    goals
        .into_iter()
        .filter(|g| !g.completed && g.references(item))
        .map(|g| DependentGoal {
            goal_id: g.id,
            title: g.title.clone(),
        })
        .collect()
}

/// Build removal patches for every affected goal.
///
/// Survivors keep their relative proportions: their current weights are fed
/// back through the normalizer, so `[50, 30, 20]` minus the 30 becomes
/// `[70, 30]`, not an equal split. If removal empties a composition the goal
/// simply reverts to leaf semantics; an empty patch is not an error. If all
/// surviving weights are zero, the normalizer's equal-split branch applies.
pub fn apply_removal<'a>(
    item: ItemRef,
    goals: impl IntoIterator<Item = &'a Goal>,
) -> Vec<GoalCompositionPatch> {
    goals
        .into_iter()
        .filter(|g| !g.completed && g.references(item))
        .map(|g| removal_patch(g, item))
        .collect()
}

fn removal_patch(goal: &Goal, item: ItemRef) -> GoalCompositionPatch {
    let mut sub_goals: Vec<SubGoalLink> = goal
        .sub_goals
        .iter()
        .filter(|l| match item {
            ItemRef::Goal(id) => !matches!(
                &l.kind,
                crate::model::SubGoalKind::Linked { goal_id } if *goal_id == id
            ),
            ItemRef::Habit(_) => true,
        })
        .cloned()
        .collect();
    let mut habit_links: Vec<HabitLink> = goal
        .habit_links
        .iter()
        .filter(|l| match item {
            ItemRef::Habit(id) => l.habit_id != id,
            ItemRef::Goal(_) => true,
        })
        .cloned()
        .collect();

    let weights: Vec<u32> = sub_goals
        .iter()
        .map(|l| l.weight)
        .chain(habit_links.iter().map(|l| l.weight))
        .collect();
    let normalized = normalize(&weights);

    let split = sub_goals.len();
    for (link, w) in sub_goals.iter_mut().zip(&normalized[..split]) {
        link.weight = *w;
    }
    for (link, w) in habit_links.iter_mut().zip(&normalized[split..]) {
        link.weight = *w;
    }

    GoalCompositionPatch {
        goal_id: goal.id,
        sub_goals,
        habit_links,
    }
}
