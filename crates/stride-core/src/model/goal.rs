//! Goal and composition-item models.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::{GoalId, HabitId, ItemRef, UserId};

/// A user goal, optionally decomposed into weighted sub-goals and habits.
///
/// A goal with an empty composition is a "leaf goal": it is completed only
/// by direct manual action and its progress is 0 or 100, never in between.
///
/// `cooldown_started_at` is the reference event for the completion lock: it
/// equals `created_at` at creation and is reset to the un-completion instant
/// when a completed goal is reopened, so a reopened goal cannot be
/// immediately re-completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub owner: UserId,
    pub title: String,
    pub category: Option<String>,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub cooldown_started_at: OffsetDateTime,
    pub target_date: Option<Date>,
    pub sub_goals: Vec<SubGoalLink>,
    pub habit_links: Vec<HabitLink>,
}

impl Goal {
    /// Create a fresh leaf goal owned by `owner`.
    pub fn new(owner: UserId, title: impl Into<String>, created_at: OffsetDateTime) -> Self {
        Self {
            id: GoalId::new(),
            owner,
            title: title.into(),
            category: None,
            completed: false,
            completed_at: None,
            created_at,
            cooldown_started_at: created_at,
            target_date: None,
            sub_goals: Vec::new(),
            habit_links: Vec::new(),
        }
    }

    /// Total number of composition items (sub-goal links + habit links).
    pub fn composition_len(&self) -> usize {
        self.sub_goals.len() + self.habit_links.len()
    }

    /// True when the goal has no composition items.
    pub fn is_leaf(&self) -> bool {
        self.sub_goals.is_empty() && self.habit_links.is_empty()
    }

    /// Ids of goals this goal links as sub-goals, in composition order.
    pub fn linked_goal_ids(&self) -> impl Iterator<Item = GoalId> + '_ {
        self.sub_goals.iter().filter_map(|l| match &l.kind {
            SubGoalKind::Linked { goal_id } => Some(*goal_id),
            SubGoalKind::Inline { .. } => None,
        })
    }

    /// True when any composition item references `item`.
    pub fn references(&self, item: ItemRef) -> bool {
        match item {
            ItemRef::Goal(id) => self.linked_goal_ids().any(|g| g == id),
            ItemRef::Habit(id) => self.habit_links.iter().any(|l| l.habit_id == id),
        }
    }

    /// Current weights of all composition items, sub-goals first, in order.
    pub fn weights(&self) -> Vec<u32> {
        self.sub_goals
            .iter()
            .map(|l| l.weight)
            .chain(self.habit_links.iter().map(|l| l.weight))
            .collect()
    }

    /// Write a normalized weight vector back onto the composition items.
    ///
    /// The vector must have been produced from [`Goal::weights`] of the same
    /// composition (same length, same order).
    pub fn set_weights(&mut self, weights: &[u32]) {
        debug_assert_eq!(weights.len(), self.composition_len());
        let split = self.sub_goals.len();
        for (link, w) in self.sub_goals.iter_mut().zip(&weights[..split.min(weights.len())]) {
            link.weight = *w;
        }
        for (link, w) in self.habit_links.iter_mut().zip(&weights[split.min(weights.len())..]) {
            link.weight = *w;
        }
    }
}

/// The two mutually exclusive shapes of a sub-goal link.
///
/// An inline entry stores its own completion state; a linked entry derives
/// it from the referenced goal. Modeling this as a tagged union makes the
/// invalid mixed state (both a stored flag and a reference) unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubGoalKind {
    /// A free-standing checklist item with no backing entity.
    Inline { title: String, completed: bool },
    /// A reference to another goal owned by the same user.
    Linked { goal_id: GoalId },
}

/// One weighted sub-goal entry in a goal's composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubGoalLink {
    /// Integer multiple of 5 in [0,100]; the whole composition sums to 100
    /// once normalized.
    pub weight: u32,
    #[serde(flatten)]
    pub kind: SubGoalKind,
    pub note: Option<String>,
}

impl SubGoalLink {
    pub fn inline(title: impl Into<String>, weight: u32) -> Self {
        Self {
            weight,
            kind: SubGoalKind::Inline {
                title: title.into(),
                completed: false,
            },
            note: None,
        }
    }

    pub fn linked(goal_id: GoalId, weight: u32) -> Self {
        Self {
            weight,
            kind: SubGoalKind::Linked { goal_id },
            note: None,
        }
    }
}

/// One weighted habit entry in a goal's composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitLink {
    pub habit_id: HabitId,
    pub weight: u32,
    /// Start of the progress window; `None` falls back to goal creation.
    pub start_date: Option<Date>,
    /// After this date the habit no longer contributes to the goal's
    /// progress window.
    pub end_date: Option<Date>,
}

impl HabitLink {
    pub fn new(habit_id: HabitId, weight: u32) -> Self {
        Self {
            habit_id,
            weight,
            start_date: None,
            end_date: None,
        }
    }
}
