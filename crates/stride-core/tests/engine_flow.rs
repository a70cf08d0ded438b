//! Engine facade tests over in-memory collaborators.
//!
//! Exercises the external interface end to end: link validation, progress
//! reads, dependent scans, removal patches, and completion-lock timing with
//! a fixed injected clock.

use std::cell::Cell;
use std::collections::HashMap;

use assert_matches::assert_matches;
use stride_core::prelude::*;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

const T0: OffsetDateTime = datetime!(2026-06-01 09:00 UTC);

#[derive(Default)]
struct MemStore {
    goals: HashMap<GoalId, Goal>,
    habits: HashMap<HabitId, Habit>,
}

impl MemStore {
    fn put_goal(&mut self, g: Goal) -> GoalId {
        let id = g.id;
        self.goals.insert(id, g);
        id
    }

    fn put_habit(&mut self, h: Habit) -> HabitId {
        let id = h.id;
        self.habits.insert(id, h);
        id
    }
}

impl GoalStore for MemStore {
    fn goal(&self, id: GoalId) -> Option<Goal> {
        self.goals.get(&id).cloned()
    }

    fn goals_of(&self, owner: UserId) -> Vec<Goal> {
        self.goals
            .values()
            .filter(|g| g.owner == owner)
            .cloned()
            .collect()
    }
}

impl HabitStore for MemStore {
    fn habit(&self, id: HabitId) -> Option<Habit> {
        self.habits.get(&id).cloned()
    }
}

struct FixedClock(Cell<OffsetDateTime>);

impl FixedClock {
    fn at(t: OffsetDateTime) -> Self {
        Self(Cell::new(t))
    }

    fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0.get()
    }
}

fn engine<'a>(
    store: &'a MemStore,
    clock: &'a FixedClock,
) -> Engine<'a, MemStore, MemStore, FixedClock> {
    Engine::new(store, store, clock, EngineConfig::default())
}

#[test]
fn link_validation_rejects_reverse_edges() {
    let mut store = MemStore::default();
    let owner = UserId::new();

    let mut a = Goal::new(owner, "a", T0);
    let b = Goal::new(owner, "b", T0);
    let b_id = b.id;
    a.sub_goals.push(SubGoalLink::linked(b_id, 100));
    let a_id = store.put_goal(a);
    store.put_goal(b);

    let clock = FixedClock::at(T0);
    let engine = engine(&store, &clock);

    assert_matches!(
        engine.validate_link(b_id, a_id),
        Err(EngineError::CycleDetected { .. })
    );
    // The forward edge remains fine to re-validate.
    engine.validate_link(a_id, b_id).unwrap();
}

#[test]
fn progress_read_resolves_nested_links() {
    let mut store = MemStore::default();
    let owner = UserId::new();

    let mut child = Goal::new(owner, "child", T0);
    child.completed = true;
    let child_id = store.put_goal(child);

    let mut parent = Goal::new(owner, "parent", T0);
    parent.sub_goals.push(SubGoalLink::linked(child_id, 60));
    parent.sub_goals.push(SubGoalLink::inline("open", 40));
    let parent_id = store.put_goal(parent);

    let clock = FixedClock::at(T0);
    let engine = engine(&store, &clock);

    assert_eq!(engine.compute_goal_progress(parent_id).unwrap(), 60);
    assert_eq!(engine.compute_goal_progress(child_id).unwrap(), 100);
}

#[test]
fn unknown_goal_progress_is_a_typed_error() {
    let store = MemStore::default();
    let clock = FixedClock::at(T0);
    let engine = engine(&store, &clock);

    assert_matches!(
        engine.compute_goal_progress(GoalId::new()),
        Err(EngineError::UnknownReference { .. })
    );
}

#[test]
fn removal_flow_warns_then_patches() {
    let mut store = MemStore::default();
    let owner = UserId::new();

    let habit = Habit::new(owner, "meditate", T0);
    let habit_id = store.put_habit(habit);

    let mut g = Goal::new(owner, "calm", T0);
    g.sub_goals.push(SubGoalLink::inline("read about it", 50));
    g.habit_links.push(HabitLink::new(habit_id, 30));
    g.sub_goals.push(SubGoalLink::inline("retreat", 20));
    let g_id = store.put_goal(g);

    let clock = FixedClock::at(T0);
    let engine = engine(&store, &clock);

    let dependents = engine.find_dependent_goals(ItemRef::Habit(habit_id)).unwrap();
    assert_eq!(dependents.len(), 1);
    assert_eq!(dependents[0].goal_id, g_id);

    let patches = engine.apply_removal(ItemRef::Habit(habit_id)).unwrap();
    assert_eq!(patches.len(), 1);
    assert!(patches[0].habit_links.is_empty());
    let weights: Vec<u32> = patches[0].sub_goals.iter().map(|l| l.weight).collect();
    assert_eq!(weights, vec![70, 30]);
}

#[test]
fn completion_lock_follows_the_clock() {
    let mut store = MemStore::default();
    let owner = UserId::new();
    let goal_id = store.put_goal(Goal::new(owner, "ship it", T0));

    let clock = FixedClock::at(T0);
    let engine = engine(&store, &clock);
    let item = ItemRef::Goal(goal_id);

    let state = engine.completion_lock_state(item).unwrap();
    assert!(state.locked);
    assert_eq!(state.time_until_can_complete, Duration::hours(24));

    clock.advance(Duration::hours(1));
    assert_matches!(
        engine.check_completion_allowed(item),
        Err(EngineError::StillLocked { remaining }) if remaining == Duration::hours(23)
    );

    clock.advance(Duration::hours(23) + Duration::seconds(1));
    engine.check_completion_allowed(item).unwrap();
    let state = engine.completion_lock_state(item).unwrap();
    assert!(!state.locked);
    assert_eq!(state.time_until_can_complete, Duration::ZERO);
}

#[test]
fn recurring_habit_uses_the_recompletion_cooldown() {
    let mut store = MemStore::default();
    let owner = UserId::new();

    let mut habit = Habit::new(owner, "stretch", T0);
    habit.total_completions = 3;
    habit.cooldown_started_at = T0;
    let habit_id = store.put_habit(habit);

    let clock = FixedClock::at(T0);
    let engine = engine(&store, &clock);

    let state = engine.completion_lock_state(ItemRef::Habit(habit_id)).unwrap();
    assert_eq!(
        state.time_until_can_complete,
        EngineConfig::default().cooldown.habit_recompletion
    );
}

#[test]
fn composition_validation_enforces_tier_cap_and_freeze() {
    let mut store = MemStore::default();
    let owner = UserId::new();

    let mut g = Goal::new(owner, "busy", T0);
    for i in 0..11 {
        g.sub_goals.push(SubGoalLink::inline(format!("item {i}"), 5));
    }
    store.put_goal(g.clone());

    let clock = FixedClock::at(T0);
    let engine = engine(&store, &clock);

    assert_matches!(
        engine.validate_composition(&g, AccountTier::Free),
        Err(EngineError::CompositionLimitExceeded { count: 11, max: 10 })
    );
    engine.validate_composition(&g, AccountTier::Premium).unwrap();

    g.completed = true;
    assert_matches!(
        engine.validate_composition(&g, AccountTier::Premium),
        Err(EngineError::FrozenComposition { .. })
    );
}
