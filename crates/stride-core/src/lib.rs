//! stride-core
//!
//! Goal composition and weighted progress engine for Stride:
//! - Weight normalization to an exact-100, multiple-of-5 distribution
//! - Cycle-safe linking between goals
//! - Recursive progress aggregation over sub-goals and habit links
//! - Dependency-aware removal with proportional weight redistribution
//! - Completion cooldowns and habit streak derivation
//!
//! The engine is pure and synchronous: it operates on entities supplied by a
//! storage collaborator, reads the clock only through an injected trait, and
//! returns updated entities plus derived values for the collaborator to
//! persist. Concurrency control (per-goal serialization of mutations) is the
//! storage layer's responsibility.

pub mod config;
pub mod deps;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod lock;
pub mod model;
pub mod progress;
pub mod store;
pub mod streak;
pub mod weights;

pub use crate::errors::{EngineError, EngineResult};
pub use crate::weights::{WEIGHT_STEP, WEIGHT_TOTAL};

/// Convenience re-exports.
pub mod prelude {
    pub use crate::config::{AccountTier, CooldownConfig, EngineConfig, LimitsConfig};
    pub use crate::deps::{DependentGoal, GoalCompositionPatch};
    pub use crate::engine::Engine;
    pub use crate::graph::CompositionResolver;
    pub use crate::lock::LockState;
    pub use crate::model::{
        DayOfWeek, Frequency, Goal, GoalId, Habit, HabitId, HabitLink, HabitLogEntry, ItemRef,
        LogStatus, SubGoalKind, SubGoalLink, UserId,
    };
    pub use crate::store::{Clock, GoalStore, HabitStore};
    pub use crate::streak::StreakSummary;
    pub use crate::{EngineError, EngineResult, WEIGHT_STEP, WEIGHT_TOTAL};
}
