//! Non-blocking gate locks.
//!
//! A gate is taken with `try_lock` and released when its `LockGuard` drops.
//! The sync store uses one to reject overlapping refreshes instead of queueing
//! them behind the in-flight one.

mod error;
mod guard;
mod in_memory;
mod lock;

pub use error::LockError;
pub use guard::LockGuard;
pub use in_memory::InMemoryLock;
pub use lock::Lock;
