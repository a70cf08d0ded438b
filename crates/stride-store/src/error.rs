//! Store-level errors.

use stride_core::errors::EngineError;
use stride_core::model::{HabitId, ItemRef};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The entity does not exist in this store.
    #[error("not found: {0}")]
    NotFound(ItemRef),

    /// The engine rejected the mutation; the typed kind is preserved for
    /// the caller to translate into user-facing copy.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The item still has dependent goals and the caller has not confirmed
    /// the removal.
    #[error("{0} is referenced by {1} goal(s); removal requires confirmation")]
    RemovalNeedsConfirmation(ItemRef, usize),

    /// The habit is archived or deactivated; its log and counters are
    /// read-only until it is restored.
    #[error("habit {0} is archived; new log entries are not accepted")]
    HabitArchived(HabitId),
}
