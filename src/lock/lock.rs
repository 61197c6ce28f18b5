use super::LockError;

/// Trait for a single gate lock.
///
/// Acquisition never blocks: callers that find the gate held are expected to
/// back off and report it, not wait. The in-memory lock uses a `Mutex<bool>`;
/// a store shared between processes could back this with a lease in a
/// database instead.
pub trait Lock: Send + Sync {
    /// Try to acquire the lock.
    /// Returns `Ok(true)` if acquired, `Ok(false)` if already held.
    fn try_lock(&self) -> Result<bool, LockError>;

    /// Release the lock. Releasing an unheld lock is a no-op.
    fn unlock(&self) -> Result<(), LockError>;
}
