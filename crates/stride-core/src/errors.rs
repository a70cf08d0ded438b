//! Error types for stride-core.
//!
//! The engine never panics for expected domain conditions: every rejected
//! mutation or failed lookup is a typed variant carrying enough context
//! (offending id, current vs. allowed value) for a caller to render a
//! user-facing message. Hard failures are reserved for programmer errors
//! and surface as [`EngineError::Invariant`].

use time::Duration;

use crate::model::{GoalId, ItemRef};

/// Result alias used throughout the crate.
pub type EngineResult<T> = Result<T, EngineError>;

/// All failure modes the engine reports to its caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A caller-entered weight is out of [0,100] or not a multiple of 5.
    ///
    /// Raised on explicit entry prior to normalization; `normalize` itself
    /// never fails.
    #[error("invalid weight {value}: must be a multiple of 5 in 0..=100")]
    InvalidWeight { value: u32 },

    /// Adding the link would make the parent reachable from the candidate.
    #[error("linking goal {candidate} would create a cycle back to {parent}")]
    CycleDetected { parent: GoalId, candidate: GoalId },

    /// A goal may not link itself.
    #[error("goal {goal} cannot link itself as a sub-goal")]
    SelfReference { goal: GoalId },

    /// The referenced goal or habit belongs to a different user.
    #[error("{item} is not owned by the same user as goal {parent}")]
    CrossOwnerReference { parent: GoalId, item: ItemRef },

    /// The composition would exceed the account tier's item cap.
    #[error("composition has {count} items, tier allows at most {max}")]
    CompositionLimitExceeded { count: usize, max: usize },

    /// A completion request arrived before the cooldown elapsed.
    #[error("completion is locked for another {remaining}")]
    StillLocked { remaining: Duration },

    /// A `linkedGoalId`/`habitId` did not resolve.
    #[error("unknown reference: {id}")]
    UnknownReference { id: ItemRef },

    /// Composition items of a completed goal are read-only.
    #[error("goal {goal} is completed; its composition is frozen")]
    FrozenComposition { goal: GoalId },

    /// Programmer error: a condition that should be unreachable.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl EngineError {
    /// Construct a programmer-error invariant failure.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Stable machine-readable code for callers that map errors to UI copy.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidWeight { .. } => "invalid_weight",
            Self::CycleDetected { .. } => "cycle_detected",
            Self::SelfReference { .. } => "self_reference",
            Self::CrossOwnerReference { .. } => "cross_owner_reference",
            Self::CompositionLimitExceeded { .. } => "composition_limit_exceeded",
            Self::StillLocked { .. } => "still_locked",
            Self::UnknownReference { .. } => "unknown_reference",
            Self::FrozenComposition { .. } => "frozen_composition",
            Self::Invariant(_) => "invariant",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GoalId;

    #[test]
    fn codes_are_stable() {
        let g = GoalId::new();
        assert_eq!(EngineError::SelfReference { goal: g }.code(), "self_reference");
        assert_eq!(EngineError::invariant("x").code(), "invariant");
    }

    #[test]
    fn display_includes_context() {
        let e = EngineError::CompositionLimitExceeded { count: 12, max: 10 };
        let s = e.to_string();
        assert!(s.contains("12"));
        assert!(s.contains("10"));
    }
}
