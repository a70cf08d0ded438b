//! stride-store
//!
//! The storage collaborator the composition engine is specified against:
//! an in-memory entity store plus the thin service layer that wires engine
//! calls into mutations (set composition, complete, log habit days, remove
//! referenced items).
//!
//! Concurrency contract: the engine itself is pure and assumes a single
//! consistent snapshot per operation. This crate provides that by
//! serializing mutations behind one writer lock; a database-backed store
//! would use optimistic versioning or per-entity locks instead.

pub mod clock;
pub mod error;
pub mod memory;
pub mod service;

pub use crate::clock::{FixedClock, SystemClock};
pub use crate::error::{StoreError, StoreResult};
pub use crate::memory::InMemoryStore;
pub use crate::service::Service;
