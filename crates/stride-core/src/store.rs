//! Collaborator seams.
//!
//! The engine does no I/O and reads no clocks. Everything it needs from the
//! outside world comes through these three traits, implemented by the
//! surrounding CRUD layer over whatever persistence it uses. All lookups
//! return owned snapshots: the engine assumes each operation runs over a
//! single consistent snapshot serialized per-goal by the store.

use time::OffsetDateTime;

use crate::graph::CompositionResolver;
use crate::model::{Goal, GoalId, Habit, HabitId, UserId};

/// Read access to goals.
pub trait GoalStore {
    fn goal(&self, id: GoalId) -> Option<Goal>;

    /// All goals owned by `owner`. The dependency tracker scans these; a
    /// store may back this with a goal-by-referenced-item index instead of
    /// a full scan when compositions grow large.
    fn goals_of(&self, owner: UserId) -> Vec<Goal>;
}

/// Read access to habits (including their owned logs).
pub trait HabitStore {
    fn habit(&self, id: HabitId) -> Option<Habit>;
}

/// Injected clock. Core never calls system time directly.
pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

/// Adapter exposing a [`GoalStore`] as the graph validator's read
/// collaborator.
pub struct GoalStoreResolver<'a, G: GoalStore>(pub &'a G);

impl<G: GoalStore> CompositionResolver for GoalStoreResolver<'_, G> {
    fn owner_of(&self, goal: GoalId) -> Option<UserId> {
        self.0.goal(goal).map(|g| g.owner)
    }

    fn linked_goals_of(&self, goal: GoalId) -> Option<Vec<GoalId>> {
        self.0.goal(goal).map(|g| g.linked_goal_ids().collect())
    }
}
