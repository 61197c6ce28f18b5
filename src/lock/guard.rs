use std::sync::Arc;

use super::{Lock, LockError};

/// Owned handle to an acquired lock. Unlocks on drop.
///
/// Owning an `Arc` lets the guard outlive the borrow of whatever handed out
/// the lock, so it can travel into spawned tasks and still release the gate
/// if the task is aborted.
pub struct LockGuard<L: Lock> {
    lock: Arc<L>,
}

impl<L: Lock> LockGuard<L> {
    /// Try to acquire `lock`. `Ok(None)` means it is already held.
    pub fn try_acquire(lock: &Arc<L>) -> Result<Option<Self>, LockError> {
        if lock.try_lock()? {
            Ok(Some(LockGuard {
                lock: Arc::clone(lock),
            }))
        } else {
            Ok(None)
        }
    }
}

impl<L: Lock> Drop for LockGuard<L> {
    fn drop(&mut self) {
        if let Err(e) = self.lock.unlock() {
            tracing::warn!(error = %e, "failed to release lock");
        }
    }
}
