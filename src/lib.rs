mod campaign;
mod error;
mod filter;
mod lock;
mod remote;
mod sync;

pub use campaign::{Campaign, CampaignDraft, ClientInfo};
pub use error::SyncError;
pub use filter::{
    MatchMode, SearchSelectFilter, SelectableItem, SelectionAction, SelectionError, SelectionMode,
};
pub use lock::{InMemoryLock, Lock, LockError, LockGuard};
pub use remote::{InMemoryCampaignService, RemoteCampaignService, RemoteError, RemoteOp};
pub use sync::{
    CampaignSyncStore, ConfigError, RefreshOutcome, ScheduledRefresh, StoreState, SyncConfig,
};

// Re-exported so service implementations don't need their own dependency.
pub use async_trait::async_trait;
