//! Campaign records as seen by the admin client.
//!
//! A `Campaign` is owned by the remote service; the store only caches copies.
//! New campaigns are described by a `CampaignDraft`, which has no id until the
//! service assigns one.

mod client_info;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use client_info::ClientInfo;

const EMPTY_FIELD: &str = "<Empty>";

/// A remotely stored alert campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    /// URL or action identifier triggered by the alert's button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targeting: Option<ClientInfo>,
    /// Service-specific fields the client does not interpret.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

impl Campaign {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            body: None,
            button_action: None,
            targeting: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Build the campaign a draft becomes once the service assigns `id`.
    pub fn from_draft(id: impl Into<String>, draft: CampaignDraft) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            body: draft.body,
            button_action: draft.button_action,
            targeting: draft.targeting,
            metadata: draft.metadata,
        }
    }

    /// Row detail text: `"<title>, <body>"`, with `<Empty>` for missing parts.
    pub fn summary(&self) -> String {
        format!(
            "{}, {}",
            self.title.as_deref().unwrap_or(EMPTY_FIELD),
            self.body.as_deref().unwrap_or(EMPTY_FIELD)
        )
    }
}

/// A campaign that has not been created yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targeting: Option<ClientInfo>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

impl CampaignDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_button_action(mut self, action: impl Into<String>) -> Self {
        self.button_action = Some(action.into());
        self
    }

    pub fn with_targeting(mut self, targeting: ClientInfo) -> Self {
        self.targeting = Some(targeting);
        self
    }

    /// The canned campaign the admin debug menu creates.
    pub fn test_campaign() -> Self {
        Self::new()
            .with_title("Test Alert")
            .with_body("This is a test alert campaign")
            .with_button_action("https://example.com")
    }
}
