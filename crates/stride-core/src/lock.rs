//! Completion-cooldown gating.
//!
//! Each completable entity carries a reference timestamp (creation,
//! un-completion, or the previous completion for recurring habits). The lock
//! is a pure function of the clock: no stored state transitions, no timers.
//! `Locked` simply means `now < reference + cooldown`; re-evaluating on
//! every read keeps the state machine trivially consistent.

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::errors::{EngineError, EngineResult};

/// Snapshot of an entity's completion lock at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockState {
    pub locked: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub eligible_at: OffsetDateTime,
    /// Zero once unlockable.
    pub time_until_can_complete: Duration,
}

/// Evaluate the lock for an entity whose reference event was `reference`.
pub fn lock_state(
    reference: OffsetDateTime,
    cooldown: Duration,
    now: OffsetDateTime,
) -> LockState {
    let eligible_at = reference + cooldown;
    let remaining = eligible_at - now;
    LockState {
        locked: now < eligible_at,
        eligible_at,
        time_until_can_complete: remaining.max(Duration::ZERO),
    }
}

/// Gate an explicit completion request; `StillLocked` while the cooldown
/// has not elapsed.
pub fn check_unlocked(
    reference: OffsetDateTime,
    cooldown: Duration,
    now: OffsetDateTime,
) -> EngineResult<()> {
    let state = lock_state(reference, cooldown, now);
    if state.locked {
        return Err(EngineError::StillLocked {
            remaining: state.time_until_can_complete,
        });
    }
    Ok(())
}
