//! In-memory entity store.
//!
//! Entity maps behind a single `parking_lot` lock. Reads hand out owned
//! snapshots, which is exactly the consistency model the engine expects;
//! writers are serialized, so a weight edit can never interleave with a
//! habit removal on the same goal.

use std::collections::HashMap;

use parking_lot::RwLock;
use stride_core::deps::GoalCompositionPatch;
use stride_core::model::{Goal, GoalId, Habit, HabitId, ItemRef, UserId};
use stride_core::store::{GoalStore, HabitStore};

use crate::error::{StoreError, StoreResult};

#[derive(Default)]
struct State {
    goals: HashMap<GoalId, Goal>,
    habits: HashMap<HabitId, Habit>,
}

/// Lock-guarded entity maps implementing the engine's read traits.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_goal(&self, goal: Goal) -> GoalId {
        let id = goal.id;
        self.state.write().goals.insert(id, goal);
        id
    }

    pub fn insert_habit(&self, habit: Habit) -> HabitId {
        let id = habit.id;
        self.state.write().habits.insert(id, habit);
        id
    }

    /// Mutate one goal under the writer lock.
    pub fn update_goal(
        &self,
        id: GoalId,
        f: impl FnOnce(&mut Goal),
    ) -> StoreResult<Goal> {
        let mut state = self.state.write();
        let goal = state
            .goals
            .get_mut(&id)
            .ok_or(StoreError::NotFound(ItemRef::Goal(id)))?;
        f(goal);
        Ok(goal.clone())
    }

    /// Mutate one habit under the writer lock.
    pub fn update_habit(
        &self,
        id: HabitId,
        f: impl FnOnce(&mut Habit),
    ) -> StoreResult<Habit> {
        let mut state = self.state.write();
        let habit = state
            .habits
            .get_mut(&id)
            .ok_or(StoreError::NotFound(ItemRef::Habit(id)))?;
        f(habit);
        Ok(habit.clone())
    }

    /// Apply removal patches and delete the removed entity in one write.
    ///
    /// All-or-nothing: every id is resolved before anything is mutated, so a
    /// missing entity or patch target leaves the store untouched.
    pub fn apply_removal(
        &self,
        item: ItemRef,
        patches: &[GoalCompositionPatch],
    ) -> StoreResult<()> {
        let mut state = self.state.write();
        let exists = match item {
            ItemRef::Goal(id) => state.goals.contains_key(&id),
            ItemRef::Habit(id) => state.habits.contains_key(&id),
        };
        if !exists {
            return Err(StoreError::NotFound(item));
        }
        for patch in patches {
            if !state.goals.contains_key(&patch.goal_id) {
                return Err(StoreError::NotFound(ItemRef::Goal(patch.goal_id)));
            }
        }

        for patch in patches {
            let goal = state
                .goals
                .get_mut(&patch.goal_id)
                .ok_or(StoreError::NotFound(ItemRef::Goal(patch.goal_id)))?;
            goal.sub_goals = patch.sub_goals.clone();
            goal.habit_links = patch.habit_links.clone();
        }
        match item {
            ItemRef::Goal(id) => {
                state.goals.remove(&id);
            }
            ItemRef::Habit(id) => {
                state.habits.remove(&id);
            }
        }
        Ok(())
    }

    pub fn goal_count(&self) -> usize {
        self.state.read().goals.len()
    }

    pub fn habit_count(&self) -> usize {
        self.state.read().habits.len()
    }
}

impl GoalStore for InMemoryStore {
    fn goal(&self, id: GoalId) -> Option<Goal> {
        self.state.read().goals.get(&id).cloned()
    }

    fn goals_of(&self, owner: UserId) -> Vec<Goal> {
        self.state
            .read()
            .goals
            .values()
            .filter(|g| g.owner == owner)
            .cloned()
            .collect()
    }
}

impl HabitStore for InMemoryStore {
    fn habit(&self, id: HabitId) -> Option<Habit> {
        self.state.read().habits.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn reads_return_snapshots() {
        let store = InMemoryStore::new();
        let owner = UserId::new();
        let id = store.insert_goal(Goal::new(owner, "g", datetime!(2026-01-01 00:00 UTC)));

        let mut snapshot = store.goal(id).unwrap();
        snapshot.title = "local edit".to_string();
        assert_eq!(store.goal(id).unwrap().title, "g");
    }

    #[test]
    fn removal_of_missing_entity_leaves_patches_unapplied() {
        use stride_core::model::{HabitId, HabitLink};

        let store = InMemoryStore::new();
        let owner = UserId::new();
        let mut goal = Goal::new(owner, "g", datetime!(2026-01-01 00:00 UTC));
        goal.habit_links.push(HabitLink::new(HabitId::new(), 100));
        let goal_id = store.insert_goal(goal);

        let patch = GoalCompositionPatch {
            goal_id,
            sub_goals: Vec::new(),
            habit_links: Vec::new(),
        };
        let missing = ItemRef::Habit(HabitId::new());
        let err = store.apply_removal(missing, &[patch]).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        // The patched composition must not have been committed.
        assert_eq!(store.goal(goal_id).unwrap().habit_links.len(), 1);
    }

    #[test]
    fn update_missing_goal_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.update_goal(GoalId::new(), |_| {}).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ItemRef::Goal(_))));
    }
}
