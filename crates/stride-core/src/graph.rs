//! Cycle-safe linking between goals.
//!
//! `linkedGoalId` edges form a directed graph over a user's goals. The graph
//! must stay acyclic: a goal's progress is derived from its linked goals, so
//! a cycle would make progress undefined. This module validates a candidate
//! link *before* it is added.
//!
//! The traversal is an explicit work-stack DFS with a visited set, never
//! recursion: a pathological chain cannot overflow the call stack, and a
//! pre-existing cycle (which invariant 3 says should not exist, but a race
//! could introduce) terminates instead of looping.

use std::collections::HashSet;

use crate::errors::{EngineError, EngineResult};
use crate::model::{GoalId, UserId};

/// Read collaborator for link validation.
///
/// Implementations resolve a goal's owner and its outgoing `linkedGoalId`
/// edges from whatever storage the caller uses. Returning `None` means the
/// goal does not resolve.
pub trait CompositionResolver {
    fn owner_of(&self, goal: GoalId) -> Option<UserId>;
    fn linked_goals_of(&self, goal: GoalId) -> Option<Vec<GoalId>>;
}

/// Validate that `parent` may link `candidate` as a sub-goal.
///
/// Rejections, in check order:
/// - `SelfReference` when `candidate == parent`;
/// - `UnknownReference` when either goal does not resolve;
/// - `CrossOwnerReference` when the candidate belongs to another user;
/// - `CycleDetected` when `parent` is reachable from `candidate`.
///
/// Linking an already-completed goal is permitted; its contribution to the
/// parent's progress is simply fixed at 100%.
pub fn validate_link<R: CompositionResolver>(
    parent: GoalId,
    candidate: GoalId,
    resolver: &R,
) -> EngineResult<()> {
    if candidate == parent {
        return Err(EngineError::SelfReference { goal: parent });
    }

    let parent_owner = resolver
        .owner_of(parent)
        .ok_or(EngineError::UnknownReference {
            id: crate::model::ItemRef::Goal(parent),
        })?;
    let candidate_owner = resolver
        .owner_of(candidate)
        .ok_or(EngineError::UnknownReference {
            id: crate::model::ItemRef::Goal(candidate),
        })?;
    if parent_owner != candidate_owner {
        return Err(EngineError::CrossOwnerReference {
            parent,
            item: crate::model::ItemRef::Goal(candidate),
        });
    }

    let mut visited: HashSet<GoalId> = HashSet::new();
    let mut stack = vec![candidate];
    while let Some(current) = stack.pop() {
        if current == parent {
            return Err(EngineError::CycleDetected { parent, candidate });
        }
        if !visited.insert(current) {
            continue;
        }
        // A dangling edge is not this check's concern; the progress
        // aggregator reports it when the link is actually read.
        if let Some(next) = resolver.linked_goals_of(current) {
            stack.extend(next);
        }
    }

    Ok(())
}
