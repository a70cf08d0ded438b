//! End-to-end flows through the service layer: compose, derive progress,
//! gate completions, log habit days, and remove referenced items.

use assert_matches::assert_matches;
use time::macros::datetime;
use time::Duration;

use stride_core::errors::EngineError;
use stride_core::model::{HabitLink, ItemRef, LogStatus, SubGoalLink, UserId};
use stride_core::store::GoalStore;
use stride_store::{FixedClock, Service, StoreError};

fn service() -> Service<FixedClock> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    Service::new(FixedClock::at(datetime!(2026-04-01 07:00 UTC)))
}

#[test]
fn composition_weights_are_normalized_on_write() {
    let svc = service();
    let owner = UserId::new();
    let goal = svc.create_goal(owner, "learn spanish");

    let updated = svc
        .set_composition(
            goal,
            vec![
                SubGoalLink::inline("finish course", 50),
                SubGoalLink::inline("read a novel", 20),
            ],
            vec![],
        )
        .unwrap();

    assert_eq!(updated.weights(), vec![70, 30]);
}

#[test]
fn completing_a_linked_leaf_raises_parent_progress() {
    let svc = service();
    let owner = UserId::new();
    let parent = svc.create_goal(owner, "get fit");
    let leaf = svc.create_goal(owner, "run a 10k");

    svc.set_composition(
        parent,
        vec![
            SubGoalLink::inline("join a gym", 50),
            SubGoalLink::linked(leaf, 50),
        ],
        vec![],
    )
    .unwrap();
    assert_eq!(svc.goal_progress(parent).unwrap(), 0);

    advance(&svc, Duration::hours(25));
    svc.complete_goal(leaf).unwrap();

    assert_eq!(svc.goal_progress(parent).unwrap(), 50);
}

#[test]
fn linking_back_to_an_ancestor_is_rejected() {
    let svc = service();
    let owner = UserId::new();
    let a = svc.create_goal(owner, "a");
    let b = svc.create_goal(owner, "b");

    svc.set_composition(a, vec![SubGoalLink::linked(b, 100)], vec![])
        .unwrap();
    let err = svc
        .set_composition(b, vec![SubGoalLink::linked(a, 100)], vec![])
        .unwrap_err();

    assert_matches!(err, StoreError::Engine(EngineError::CycleDetected { .. }));
}

#[test]
fn cross_owner_habit_link_is_rejected() {
    let svc = service();
    let alice = UserId::new();
    let bob = UserId::new();
    let goal = svc.create_goal(alice, "meditate daily");
    let habit = svc.create_habit(bob, "meditation");

    let err = svc
        .set_composition(goal, vec![], vec![HabitLink::new(habit, 100)])
        .unwrap_err();

    assert_matches!(
        err,
        StoreError::Engine(EngineError::CrossOwnerReference { .. })
    );
}

#[test]
fn goal_completion_is_gated_by_the_cooldown() {
    let svc = service();
    let owner = UserId::new();
    let goal = svc.create_goal(owner, "ship the side project");

    // Fresh goals cool down from creation.
    let err = svc.complete_goal(goal).unwrap_err();
    assert_matches!(err, StoreError::Engine(EngineError::StillLocked { .. }));

    advance(&svc, Duration::hours(24) + Duration::seconds(1));
    let done = svc.complete_goal(goal).unwrap();
    assert!(done.completed);
    assert!(done.completed_at.is_some());

    // Reopening restarts the cooldown, so an immediate re-complete fails.
    let reopened = svc.uncomplete_goal(goal).unwrap();
    assert!(!reopened.completed);
    let err = svc.complete_goal(goal).unwrap_err();
    assert_matches!(err, StoreError::Engine(EngineError::StillLocked { .. }));
}

#[test]
fn habit_logging_refreshes_streaks_and_recurring_cooldown() {
    let svc = service();
    let owner = UserId::new();
    let habit = svc.create_habit(owner, "morning pages");

    advance(&svc, Duration::hours(25)); // now 2026-04-02 08:00
    let h = svc
        .log_habit_day(habit, time::macros::date!(2026 - 04 - 02), LogStatus::Completed)
        .unwrap();
    assert_eq!(h.current_streak, 1);
    assert_eq!(h.total_completions, 1);

    // The completion restarted the cooldown; the next one is still locked.
    let err = svc
        .log_habit_day(habit, time::macros::date!(2026 - 04 - 03), LogStatus::Completed)
        .unwrap_err();
    assert_matches!(err, StoreError::Engine(EngineError::StillLocked { .. }));

    // Non-completion statuses are not completion requests.
    svc.log_habit_day(habit, time::macros::date!(2026 - 04 - 01), LogStatus::Skipped)
        .unwrap();

    advance(&svc, Duration::hours(21)); // past the 20h recurring cooldown
    let h = svc
        .log_habit_day(habit, time::macros::date!(2026 - 04 - 03), LogStatus::Completed)
        .unwrap();
    assert_eq!(h.current_streak, 2);
    assert_eq!(h.total_completions, 2);
}

#[test]
fn archived_habit_rejects_new_log_entries() {
    let svc = service();
    let owner = UserId::new();
    let habit = svc.create_habit(owner, "cold shower");

    advance(&svc, Duration::hours(25));
    let h = svc
        .log_habit_day(habit, time::macros::date!(2026 - 04 - 02), LogStatus::Completed)
        .unwrap();
    assert_eq!(h.current_streak, 1);

    let archived = svc.archive_habit(habit).unwrap();
    assert!(archived.is_archived);
    assert!(!archived.is_active);
    // History and counters survive archiving untouched.
    assert_eq!(archived.current_streak, 1);
    assert_eq!(archived.total_completions, 1);
    assert_eq!(archived.log.len(), 1);

    advance(&svc, Duration::hours(48));
    let err = svc
        .log_habit_day(habit, time::macros::date!(2026 - 04 - 04), LogStatus::Completed)
        .unwrap_err();
    assert_matches!(err, StoreError::HabitArchived(id) if id == habit);
}

#[test]
fn removal_warns_then_redistributes_weights() {
    let svc = service();
    let owner = UserId::new();
    let goal = svc.create_goal(owner, "write a novel");
    let habit = svc.create_habit(owner, "write 500 words");

    svc.set_composition(
        goal,
        vec![
            SubGoalLink::inline("outline", 50),
            SubGoalLink::inline("first draft", 20),
        ],
        vec![HabitLink::new(habit, 30)],
    )
    .unwrap();

    let err = svc.remove(ItemRef::Habit(habit), false).unwrap_err();
    assert_matches!(err, StoreError::RemovalNeedsConfirmation(_, 1));

    let dependents = svc.remove(ItemRef::Habit(habit), true).unwrap();
    assert_eq!(dependents.len(), 1);
    assert_eq!(dependents[0].goal_id, goal);

    let goal = svc.store().goal(goal).unwrap();
    assert!(goal.habit_links.is_empty());
    assert_eq!(goal.weights(), vec![70, 30]);
    assert_eq!(svc.store().habit_count(), 0);
}

#[test]
fn removing_an_unreferenced_habit_needs_no_confirmation() {
    let svc = service();
    let owner = UserId::new();
    let habit = svc.create_habit(owner, "floss");

    let dependents = svc.remove(ItemRef::Habit(habit), false).unwrap();
    assert!(dependents.is_empty());
    assert_eq!(svc.store().habit_count(), 0);
}

fn advance(svc: &Service<FixedClock>, by: Duration) {
    svc.clock().advance(by);
}
