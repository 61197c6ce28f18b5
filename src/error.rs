use std::fmt;

use crate::lock::LockError;
use crate::remote::RemoteError;

/// Recoverable failure of a sync store operation.
///
/// These are reported as data in the operation's error list; the caller
/// decides whether to surface them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The remote service failed or rejected the call.
    RemoteFailure(String),
    /// A refresh was requested while another refresh was in flight.
    Busy,
    /// The refresh gate could not be consulted.
    Lock(LockError),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::RemoteFailure(msg) => write!(f, "remote failure: {}", msg),
            SyncError::Busy => write!(f, "a refresh is already in progress"),
            SyncError::Lock(e) => write!(f, "refresh gate unavailable: {}", e),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Lock(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RemoteError> for SyncError {
    fn from(e: RemoteError) -> Self {
        SyncError::RemoteFailure(e.to_string())
    }
}

impl From<LockError> for SyncError {
    fn from(e: LockError) -> Self {
        SyncError::Lock(e)
    }
}
