use serde::{Deserialize, Serialize};

/// Describes the client app a campaign targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub bundle_identifier: String,
    #[serde(default)]
    pub preferred_languages: Vec<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    pub app_version: String,
    pub os_version: String,
}

impl ClientInfo {
    pub fn new(
        bundle_identifier: impl Into<String>,
        app_version: impl Into<String>,
        os_version: impl Into<String>,
    ) -> Self {
        Self {
            bundle_identifier: bundle_identifier.into(),
            preferred_languages: Vec::new(),
            country_code: None,
            app_version: app_version.into(),
            os_version: os_version.into(),
        }
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_country_code(mut self, code: impl Into<String>) -> Self {
        self.country_code = Some(code.into());
        self
    }
}
