//! Service layer: the CRUD-side flows around the engine.
//!
//! Each operation follows the same shape: take a snapshot from the store,
//! let the engine validate and derive, then persist the result under the
//! writer lock. The engine is rebuilt per call; it is a stateless facade
//! over the store, the clock, and the policy config.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

use stride_core::config::{AccountTier, EngineConfig};
use stride_core::deps::DependentGoal;
use stride_core::engine::Engine;
use stride_core::lock::LockState;
use stride_core::model::{
    Goal, GoalId, Habit, HabitId, HabitLink, HabitLogEntry, ItemRef, LogStatus, SubGoalLink,
    UserId,
};
use stride_core::store::{Clock, GoalStore, HabitStore};
use stride_core::streak;

use crate::error::{StoreError, StoreResult};
use crate::memory::InMemoryStore;

/// In-process goal/habit service backed by [`InMemoryStore`].
pub struct Service<C: Clock> {
    store: InMemoryStore,
    clock: C,
    config: EngineConfig,
    tiers: RwLock<HashMap<UserId, AccountTier>>,
}

impl<C: Clock> Service<C> {
    pub fn new(clock: C) -> Self {
        Self::with_config(clock, EngineConfig::default())
    }

    pub fn with_config(clock: C, config: EngineConfig) -> Self {
        Self {
            store: InMemoryStore::new(),
            clock,
            config,
            tiers: RwLock::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn set_tier(&self, user: UserId, tier: AccountTier) {
        self.tiers.write().insert(user, tier);
    }

    fn tier_of(&self, user: UserId) -> AccountTier {
        self.tiers
            .read()
            .get(&user)
            .copied()
            .unwrap_or(AccountTier::Free)
    }

    fn engine(&self) -> Engine<'_, InMemoryStore, InMemoryStore, C> {
        Engine::new(&self.store, &self.store, &self.clock, self.config.clone())
    }

    pub fn create_goal(&self, owner: UserId, title: impl Into<String>) -> GoalId {
        let goal = Goal::new(owner, title, self.clock.now());
        let id = self.store.insert_goal(goal);
        info!(goal = %id, "goal created");
        id
    }

    pub fn create_habit(&self, owner: UserId, name: impl Into<String>) -> HabitId {
        let habit = Habit::new(owner, name, self.clock.now());
        let id = self.store.insert_habit(habit);
        info!(habit = %id, "habit created");
        id
    }

    /// Replace a goal's composition items.
    ///
    /// Runs the full mutation flow: freeze/cap/weight checks, link
    /// validation against the current graph, then weight normalization
    /// before persistence.
    pub fn set_composition(
        &self,
        goal_id: GoalId,
        sub_goals: Vec<SubGoalLink>,
        habit_links: Vec<HabitLink>,
    ) -> StoreResult<Goal> {
        let mut candidate = self
            .store
            .goal(goal_id)
            .ok_or(StoreError::NotFound(ItemRef::Goal(goal_id)))?;
        candidate.sub_goals = sub_goals;
        candidate.habit_links = habit_links;

        let engine = self.engine();
        engine.validate_composition(&candidate, self.tier_of(candidate.owner))?;

        let normalized = engine.normalize_weights(&candidate.weights());
        candidate.set_weights(&normalized);

        let updated = self.store.update_goal(goal_id, |g| {
            g.sub_goals = candidate.sub_goals.clone();
            g.habit_links = candidate.habit_links.clone();
        })?;
        info!(
            goal = %goal_id,
            items = updated.composition_len(),
            "composition updated"
        );
        Ok(updated)
    }

    /// Derived progress percent for a goal.
    pub fn goal_progress(&self, goal_id: GoalId) -> StoreResult<u8> {
        let percent = self.engine().compute_goal_progress(goal_id)?;
        debug!(goal = %goal_id, percent, "progress computed");
        Ok(percent)
    }

    /// Mark a goal completed, gated by the completion lock.
    pub fn complete_goal(&self, goal_id: GoalId) -> StoreResult<Goal> {
        self.engine()
            .check_completion_allowed(ItemRef::Goal(goal_id))?;
        let now = self.clock.now();
        let updated = self.store.update_goal(goal_id, |g| {
            g.completed = true;
            g.completed_at = Some(now);
        })?;
        info!(goal = %goal_id, "goal completed");
        Ok(updated)
    }

    /// Reopen a completed goal.
    ///
    /// Clears `completed_at`, reopens the composition for editing, and
    /// restarts the cooldown from the un-completion instant so the goal
    /// cannot be immediately re-completed.
    pub fn uncomplete_goal(&self, goal_id: GoalId) -> StoreResult<Goal> {
        let now = self.clock.now();
        let updated = self.store.update_goal(goal_id, |g| {
            g.completed = false;
            g.completed_at = None;
            g.cooldown_started_at = now;
        })?;
        info!(goal = %goal_id, "goal reopened");
        Ok(updated)
    }

    /// Record a day in a habit's log and refresh its derived counters.
    ///
    /// A `Completed` entry counts as a completion request and is gated by
    /// the lock; it also becomes the reference event for the recurring
    /// cooldown.
    pub fn log_habit_day(
        &self,
        habit_id: HabitId,
        date: time::Date,
        status: LogStatus,
    ) -> StoreResult<Habit> {
        let current = self
            .store
            .habit(habit_id)
            .ok_or(StoreError::NotFound(ItemRef::Habit(habit_id)))?;
        if !current.is_schedulable() {
            return Err(StoreError::HabitArchived(habit_id));
        }
        if status == LogStatus::Completed {
            self.engine()
                .check_completion_allowed(ItemRef::Habit(habit_id))?;
        }

        let now = self.clock.now();
        let today = now.date();
        let updated = self.store.update_habit(habit_id, |h| {
            match h.log.iter_mut().find(|e| e.date == date) {
                Some(entry) => entry.status = status,
                None => {
                    h.log.push(HabitLogEntry::new(date, status));
                    h.log.sort_by_key(|e| e.date);
                }
            }
            streak::refresh(h, today);
            if status == LogStatus::Completed {
                h.cooldown_started_at = now;
            }
        })?;
        info!(habit = %habit_id, %date, ?status, "habit day logged");
        Ok(updated)
    }

    /// Archive a habit: scheduling and streak updates stop, the log and the
    /// stored counters stay as they were.
    pub fn archive_habit(&self, habit_id: HabitId) -> StoreResult<Habit> {
        let updated = self.store.update_habit(habit_id, |h| {
            h.is_archived = true;
            h.is_active = false;
        })?;
        info!(habit = %habit_id, "habit archived");
        Ok(updated)
    }

    /// Current completion-lock state for a goal or habit.
    pub fn lock_state(&self, item: ItemRef) -> StoreResult<LockState> {
        Ok(self.engine().completion_lock_state(item)?)
    }

    /// Goals that reference `item`, for the pre-deletion warning.
    pub fn dependents(&self, item: ItemRef) -> StoreResult<Vec<DependentGoal>> {
        Ok(self.engine().find_dependent_goals(item)?)
    }

    /// Remove a habit or goal that other goals may reference.
    ///
    /// Without `confirmed`, a removal with dependents is refused so the
    /// caller can surface the affected parents. With it, the engine's
    /// patch set and the entity deletion are applied in one write.
    pub fn remove(&self, item: ItemRef, confirmed: bool) -> StoreResult<Vec<DependentGoal>> {
        let engine = self.engine();
        let dependents = engine.find_dependent_goals(item)?;
        if !dependents.is_empty() && !confirmed {
            return Err(StoreError::RemovalNeedsConfirmation(item, dependents.len()));
        }

        let patches = engine.apply_removal(item)?;
        self.store.apply_removal(item, &patches)?;
        info!(%item, patched = patches.len(), "item removed, weights redistributed");
        Ok(dependents)
    }
}
