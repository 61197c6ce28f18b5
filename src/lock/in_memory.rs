use std::sync::Mutex;

use super::{Lock, LockError};

/// In-memory gate backed by a `Mutex<bool>`.
#[derive(Default)]
pub struct InMemoryLock {
    state: Mutex<bool>,
}

impl InMemoryLock {
    pub fn new() -> Self {
        InMemoryLock {
            state: Mutex::new(false),
        }
    }
}

impl Lock for InMemoryLock {
    fn try_lock(&self) -> Result<bool, LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        if *locked {
            Ok(false)
        } else {
            *locked = true;
            Ok(true)
        }
    }

    fn unlock(&self) -> Result<(), LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        *locked = false;
        Ok(())
    }
}
