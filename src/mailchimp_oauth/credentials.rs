use crate::config::MailchimpConfig;
use crate::error::BridgeError;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use url::Url;

/// A connected MailChimp account, keyed by the login email of its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialRecord {
    pub identity: String,
    pub access_token: String,
    /// Versioned API base, e.g. `https://us1.api.mailchimp.com/3.0`.
    pub api_endpoint: String,
    /// Metadata object exactly as the provider returned it.
    pub metadata: Map<String, Value>,
    pub connected_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Combine a freshly issued access token with the account metadata.
    ///
    /// The identity comes from `login.email`; a metadata document without it
    /// is rejected rather than stored under a guessed key.
    pub fn from_metadata(
        access_token: impl Into<String>,
        metadata: Value,
        cfg: &MailchimpConfig,
    ) -> Result<Self, BridgeError> {
        let Value::Object(metadata) = metadata else {
            return Err(BridgeError::MissingEmailInMetadata);
        };

        let identity = metadata
            .get("login")
            .and_then(|login| login.get("email"))
            .and_then(Value::as_str)
            .filter(|email| !email.is_empty())
            .ok_or(BridgeError::MissingEmailInMetadata)?
            .to_string();

        let api_endpoint = metadata
            .get("api_endpoint")
            .and_then(Value::as_str)
            .filter(|endpoint| !endpoint.is_empty())
            .map(|endpoint| cfg.versioned_endpoint(endpoint))
            .ok_or(BridgeError::MissingApiEndpoint)?;

        Ok(Self {
            identity,
            access_token: access_token.into(),
            api_endpoint,
            metadata,
            connected_at: Utc::now(),
        })
    }

    /// Data-center the account lives in, when the provider reported one.
    pub fn data_center(&self) -> Option<&str> {
        self.metadata.get("dc").and_then(Value::as_str)
    }

    pub fn lists_url(&self) -> Result<Url, BridgeError> {
        self.api_url(&["lists"])
    }

    /// `list_id` is pushed as one path segment, so `/`, `?` and `#` in it are
    /// percent-encoded instead of reshaping the upstream URL.
    pub fn members_url(&self, list_id: &str) -> Result<Url, BridgeError> {
        self.api_url(&["lists", list_id, "members"])
    }

    fn api_url(&self, segments: &[&str]) -> Result<Url, BridgeError> {
        let mut url = Url::parse(&self.api_endpoint)?;
        url.path_segments_mut()
            .map_err(|()| BridgeError::InvalidApiEndpoint(self.api_endpoint.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
