use super::credentials::CredentialRecord;
use super::endpoints::MailchimpOauthEndpoints;
use crate::config::MailchimpConfig;
use crate::error::BridgeError;
use crate::service::credentials_actor::CredentialsHandle;

use axum::http::StatusCode;
use oauth2::{AuthorizationCode, TokenResponse};
use thiserror::Error as ThisError;
use tracing::info;

pub const TOKEN_EXCHANGE_FAILED: &str =
    "An unexpected error occured while trying to perform MailChimp oAuth";
pub const METADATA_FETCH_FAILED: &str =
    "An unexpected error occured while trying to get MailChimp meta oAuth";
pub const METADATA_MISSING_EMAIL: &str =
    "MailChimp account metadata did not include a login email";
pub const METADATA_MISSING_ENDPOINT: &str =
    "MailChimp account metadata did not include an API endpoint";
pub const STORE_FAILED: &str = "An unexpected error occured while saving the MailChimp account";

/// Which step of the callback pipeline gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectStage {
    TokenExchange,
    Metadata,
    Persist,
}

#[derive(Debug, ThisError)]
#[error("{stage:?} failed: {source}")]
pub struct ConnectError {
    pub stage: ConnectStage,
    #[source]
    pub source: BridgeError,
}

impl ConnectError {
    fn at(stage: ConnectStage) -> impl FnOnce(BridgeError) -> Self {
        move |source| Self { stage, source }
    }

    /// Browser-facing text. Provider details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match (&self.stage, &self.source) {
            (_, BridgeError::MissingEmailInMetadata) => METADATA_MISSING_EMAIL,
            (_, BridgeError::MissingApiEndpoint) => METADATA_MISSING_ENDPOINT,
            (ConnectStage::TokenExchange, _) => TOKEN_EXCHANGE_FAILED,
            (ConnectStage::Metadata, _) => METADATA_FETCH_FAILED,
            (ConnectStage::Persist, _) => STORE_FAILED,
        }
    }

    pub fn status(&self) -> StatusCode {
        match (&self.stage, &self.source) {
            (_, BridgeError::MissingAuthorizationCode) => StatusCode::BAD_REQUEST,
            (ConnectStage::Persist, BridgeError::StoreUnavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Composes the callback half of the OAuth flow.
pub struct MailchimpOauthService;

impl MailchimpOauthService {
    /// Token exchange, then metadata lookup, then a single store write.
    ///
    /// Each step only starts once the previous one succeeded, so a failure
    /// never leaves a partial record behind.
    pub async fn connect_account(
        cfg: &MailchimpConfig,
        code: Option<&str>,
        http_client: &reqwest::Client,
        store: &CredentialsHandle,
    ) -> Result<CredentialRecord, ConnectError> {
        let code = code
            .filter(|c| !c.is_empty())
            .ok_or(BridgeError::MissingAuthorizationCode)
            .map_err(ConnectError::at(ConnectStage::TokenExchange))?;

        let token = MailchimpOauthEndpoints::exchange_authorization_code(
            cfg,
            AuthorizationCode::new(code.to_owned()),
            http_client,
        )
        .await
        .map_err(ConnectError::at(ConnectStage::TokenExchange))?;

        let metadata =
            MailchimpOauthEndpoints::fetch_metadata(cfg, token.access_token(), http_client)
                .await
                .map_err(ConnectError::at(ConnectStage::Metadata))?;

        let record =
            CredentialRecord::from_metadata(token.access_token().secret().clone(), metadata, cfg)
                .map_err(ConnectError::at(ConnectStage::Metadata))?;

        store
            .save(record.identity.clone(), record.clone())
            .await
            .map_err(ConnectError::at(ConnectStage::Persist))?;

        info!(
            email = %record.identity,
            dc = record.data_center().unwrap_or("-"),
            "MailChimp account connected"
        );
        Ok(record)
    }
}

