//! Remote campaign service - the store's only external collaborator.
//!
//! The service is the source of truth for campaigns. Implementations talk to
//! whatever backend holds them (a cloud database, an HTTP API, ...); the sync
//! store never inspects their errors beyond reporting them.
//!
//! ## Example
//!
//! ```ignore
//! use campaign_sync::{CampaignDraft, InMemoryCampaignService, RemoteCampaignService};
//!
//! let service = InMemoryCampaignService::new();
//! service.create_campaign(CampaignDraft::test_campaign()).await?;
//! let campaigns = service.list_campaigns().await?;
//! ```

mod in_memory;

use std::fmt;

use async_trait::async_trait;

use crate::campaign::{Campaign, CampaignDraft};

pub use in_memory::InMemoryCampaignService;

/// Async CRUD surface of the remote campaign store.
#[async_trait]
pub trait RemoteCampaignService: Send + Sync {
    /// Fetch every campaign, in the service's order.
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, RemoteError>;

    /// Create a campaign. The service assigns its id.
    async fn create_campaign(&self, draft: CampaignDraft) -> Result<(), RemoteError>;

    /// Replace the stored campaign with the same id.
    async fn update_campaign(&self, campaign: Campaign) -> Result<(), RemoteError>;

    /// Delete the campaign with the given id.
    async fn delete_campaign(&self, id: &str) -> Result<(), RemoteError>;
}

/// The remote operations, used for call accounting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for RemoteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemoteOp::List => "list",
            RemoteOp::Create => "create",
            RemoteOp::Update => "update",
            RemoteOp::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Error returned by a remote service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never got a usable answer (network, auth, timeout).
    Transport(String),
    /// The service refused the request (validation, quota, conflict).
    Rejected(String),
    /// The addressed campaign does not exist.
    NotFound { id: String },
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Transport(msg) => write!(f, "transport error: {}", msg),
            RemoteError::Rejected(msg) => write!(f, "request rejected: {}", msg),
            RemoteError::NotFound { id } => write!(f, "campaign not found: {}", id),
        }
    }
}

impl std::error::Error for RemoteError {}
