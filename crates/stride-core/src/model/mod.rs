//! Stride data models.
//!
//! Strongly-typed representations of the entities the engine operates on.
//! Models are mostly "dumb" data: higher layers (the CRUD/service layer)
//! apply policy, limits, and I/O, and the engine modules (`weights`,
//! `graph`, `progress`, `deps`, `lock`, `streak`) hold the algorithms.
//!
//! Two invariants are enforced by construction here rather than by checks:
//! - a sub-goal link is *either* an inline checklist entry *or* a reference
//!   to another goal, never both ([`SubGoalKind`] is a tagged union);
//! - derived progress is never stored on a model; it is recomputed on read.

mod goal;
mod habit;

pub use goal::{Goal, HabitLink, SubGoalKind, SubGoalLink};
pub use habit::{DayOfWeek, Frequency, Habit, HabitLogEntry, LogStatus};

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(
    /// Opaque goal identity.
    GoalId
);
id_newtype!(
    /// Opaque habit identity.
    HabitId
);
id_newtype!(
    /// Opaque user identity (owners of goals and habits).
    UserId
);

/// A reference to a removable composition target: another goal or a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ItemRef {
    Goal(GoalId),
    Habit(HabitId),
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Goal(id) => write!(f, "goal:{id}"),
            Self::Habit(id) => write!(f, "habit:{id}"),
        }
    }
}

/// Structural validation helpers for model consumers.
///
/// These checks are intentionally minimal: they catch malformed caller input
/// before it reaches the algorithms. Weight-sum normalization is the job of
/// [`crate::weights::normalize`], not a validation failure.
pub mod validate {
    use super::*;
    use crate::errors::{EngineError, EngineResult};
    use crate::weights::validate_weight;

    /// Validate caller-entered weights on a goal's composition items.
    pub fn composition_weights(goal: &Goal) -> EngineResult<()> {
        for link in &goal.sub_goals {
            validate_weight(link.weight)?;
        }
        for link in &goal.habit_links {
            validate_weight(link.weight)?;
        }
        Ok(())
    }

    /// Reject a composition larger than the tier cap.
    pub fn composition_size(count: usize, max: usize) -> EngineResult<()> {
        if count > max {
            return Err(EngineError::CompositionLimitExceeded { count, max });
        }
        Ok(())
    }

    /// Reject edits to a completed goal's composition.
    pub fn composition_open(goal: &Goal) -> EngineResult<()> {
        if goal.completed {
            return Err(EngineError::FrozenComposition { goal: goal.id });
        }
        Ok(())
    }
}
