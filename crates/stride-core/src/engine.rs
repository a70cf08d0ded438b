//! The engine facade the CRUD layer calls.
//!
//! Bundles the injected collaborators (goal/habit reads, clock) and the
//! policy configuration, and exposes the operations of the composition
//! engine as one surface. Every method is synchronous and deterministic
//! over the snapshot the stores return; the engine holds no mutable state
//! of its own.

use crate::config::{AccountTier, EngineConfig};
use crate::deps::{self, DependentGoal, GoalCompositionPatch};
use crate::errors::{EngineError, EngineResult};
use crate::graph;
use crate::lock::{self, LockState};
use crate::model::{validate, Goal, GoalId, Habit, HabitId, ItemRef};
use crate::progress;
use crate::store::{Clock, GoalStore, GoalStoreResolver, HabitStore};
use crate::weights;

/// Engine facade over injected collaborators.
pub struct Engine<'a, G, H, C> {
    goals: &'a G,
    habits: &'a H,
    clock: &'a C,
    config: EngineConfig,
}

impl<'a, G, H, C> Engine<'a, G, H, C>
where
    G: GoalStore,
    H: HabitStore,
    C: Clock,
{
    pub fn new(goals: &'a G, habits: &'a H, clock: &'a C, config: EngineConfig) -> Self {
        Self {
            goals,
            habits,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Normalize a raw weight set. Pure; see [`crate::weights::normalize`].
    pub fn normalize_weights(&self, raw: &[u32]) -> Vec<u32> {
        weights::normalize(raw)
    }

    /// Validate that `parent` may link `candidate` as a sub-goal.
    pub fn validate_link(&self, parent: GoalId, candidate: GoalId) -> EngineResult<()> {
        graph::validate_link(parent, candidate, &GoalStoreResolver(self.goals))
    }

    /// Derive a goal's current progress percent.
    pub fn compute_goal_progress(&self, goal_id: GoalId) -> EngineResult<u8> {
        let goal = self.require_goal(goal_id)?;
        let today = self.clock.now().date();
        progress::compute_progress(&goal, self.goals, self.habits, today)
    }

    /// Non-completed goals of the item's owner that reference the item.
    pub fn find_dependent_goals(&self, item: ItemRef) -> EngineResult<Vec<DependentGoal>> {
        let owner = self.owner_of(item)?;
        let goals = self.goals.goals_of(owner);
        Ok(deps::find_dependents(item, goals.iter()))
    }

    /// Composition patches for every goal affected by removing `item`.
    ///
    /// All-or-nothing from the caller's perspective: the full patch set is
    /// produced before anything is returned.
    pub fn apply_removal(&self, item: ItemRef) -> EngineResult<Vec<GoalCompositionPatch>> {
        let owner = self.owner_of(item)?;
        let goals = self.goals.goals_of(owner);
        Ok(deps::apply_removal(item, goals.iter()))
    }

    /// Current completion-lock state for a goal or habit.
    pub fn completion_lock_state(&self, item: ItemRef) -> EngineResult<LockState> {
        let (reference, cooldown) = self.lock_inputs(item)?;
        Ok(lock::lock_state(reference, cooldown, self.clock.now()))
    }

    /// Gate an explicit completion request; `StillLocked` while cooling down.
    pub fn check_completion_allowed(&self, item: ItemRef) -> EngineResult<()> {
        let (reference, cooldown) = self.lock_inputs(item)?;
        lock::check_unlocked(reference, cooldown, self.clock.now())
    }

    /// Validate a goal's composition against structural rules and the
    /// account tier cap. Run before persisting any composition mutation.
    pub fn validate_composition(&self, goal: &Goal, tier: AccountTier) -> EngineResult<()> {
        validate::composition_open(goal)?;
        validate::composition_size(goal.composition_len(), self.config.limits.max_items(tier))?;
        validate::composition_weights(goal)?;

        for link in &goal.sub_goals {
            if let crate::model::SubGoalKind::Linked { goal_id } = &link.kind {
                self.validate_link(goal.id, *goal_id)?;
            }
        }
        for link in &goal.habit_links {
            let habit = self.require_habit(link.habit_id)?;
            if habit.owner != goal.owner {
                return Err(EngineError::CrossOwnerReference {
                    parent: goal.id,
                    item: ItemRef::Habit(link.habit_id),
                });
            }
        }
        Ok(())
    }

    fn require_goal(&self, id: GoalId) -> EngineResult<Goal> {
        self.goals.goal(id).ok_or(EngineError::UnknownReference {
            id: ItemRef::Goal(id),
        })
    }

    fn require_habit(&self, id: HabitId) -> EngineResult<Habit> {
        self.habits.habit(id).ok_or(EngineError::UnknownReference {
            id: ItemRef::Habit(id),
        })
    }

    fn owner_of(&self, item: ItemRef) -> EngineResult<crate::model::UserId> {
        match item {
            ItemRef::Goal(id) => Ok(self.require_goal(id)?.owner),
            ItemRef::Habit(id) => Ok(self.require_habit(id)?.owner),
        }
    }

    fn lock_inputs(
        &self,
        item: ItemRef,
    ) -> EngineResult<(time::OffsetDateTime, time::Duration)> {
        match item {
            ItemRef::Goal(id) => {
                let goal = self.require_goal(id)?;
                Ok((goal.cooldown_started_at, self.config.cooldown.goal_completion))
            }
            ItemRef::Habit(id) => {
                let habit = self.require_habit(id)?;
                // First completion uses the creation cooldown; later ones
                // use the recurring re-completion cooldown.
                let cooldown = if habit.total_completions > 0 {
                    self.config.cooldown.habit_recompletion
                } else {
                    self.config.cooldown.goal_completion
                };
                Ok((habit.cooldown_started_at, cooldown))
            }
        }
    }
}
