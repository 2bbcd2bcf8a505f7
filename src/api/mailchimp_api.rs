use crate::config::MailchimpConfig;
use crate::types::mailchimp::{MailchimpProblem, NewMember};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tracing::{debug, warn};

/// How a signup attempt ended, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupOutcome {
    Subscribed,
    AlreadySubscribed,
    Rejected(StatusCode),
    Unreachable,
}

impl SignupOutcome {
    pub fn classify(status: StatusCode, body: &[u8]) -> Self {
        if status.as_u16() < 300 {
            return Self::Subscribed;
        }
        if status == StatusCode::BAD_REQUEST {
            let problem: MailchimpProblem = serde_json::from_slice(body).unwrap_or_default();
            if problem.is_member_exists() {
                return Self::AlreadySubscribed;
            }
        }
        Self::Rejected(status)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Subscribed | Self::AlreadySubscribed)
    }
}

/// A proxied read that did not produce the expected document.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamFailure {
    /// The provider answered with a non-2xx status.
    Status { status: StatusCode, body: Value },
    /// No usable response: network failure or an unreadable body.
    Transport(String),
}

impl UpstreamFailure {
    /// The payload relayed to the client alongside the 500.
    pub fn payload(&self) -> Value {
        match self {
            Self::Status { body, .. } => body.clone(),
            Self::Transport(message) => json!({ "message": message }),
        }
    }
}

impl From<reqwest::Error> for UpstreamFailure {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Stateless calls against the MailChimp marketing API.
pub struct MailchimpApi;

impl MailchimpApi {
    /// Add a subscriber to the configured list using the static API key.
    pub async fn add_member(
        client: &reqwest::Client,
        cfg: &MailchimpConfig,
        member: &NewMember,
    ) -> SignupOutcome {
        let url = format!(
            "{}/lists/{}/members/",
            cfg.signup_api_base(),
            cfg.list_id
        );

        let resp = match client
            .post(url)
            .basic_auth("any", Some(&cfg.api_key))
            .json(member)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "MailChimp add-member request failed");
                return SignupOutcome::Unreachable;
            }
        };

        let status = resp.status();
        let body = resp.bytes().await.unwrap_or_default();
        let outcome = SignupOutcome::classify(status, &body);
        debug!(status = %status, outcome = ?outcome, "MailChimp add-member answered");
        outcome
    }

    /// GET a JSON document with an OAuth access token and pull one field out.
    ///
    /// A missing field relays as an empty array.
    pub async fn get_field(
        client: &reqwest::Client,
        url: &str,
        access_token: &str,
        field: &str,
    ) -> Result<Value, UpstreamFailure> {
        let resp = client
            .get(url)
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let body = serde_json::from_str(&text).unwrap_or_else(|_| {
                json!({ "status": status.as_u16(), "message": text })
            });
            return Err(UpstreamFailure::Status { status, body });
        }

        let mut doc: Value = resp.json().await?;
        Ok(doc
            .get_mut(field)
            .map(Value::take)
            .unwrap_or_else(|| Value::Array(Vec::new())))
    }
}
