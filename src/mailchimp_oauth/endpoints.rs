use crate::config::MailchimpConfig;
use crate::error::BridgeError;

use oauth2::{
    AccessToken, AuthType, AuthorizationCode, Client as OAuth2Client, ClientId, ClientSecret,
    EndpointNotSet, EndpointSet, RedirectUrl, RefreshToken, Scope, StandardRevocableToken,
    TokenResponse, TokenUrl,
    basic::{
        BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
        BasicTokenType,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Stateless MailChimp OAuth endpoints.
pub struct MailchimpOauthEndpoints;

impl MailchimpOauthEndpoints {
    /// Build the consent-page URL the browser is redirected to.
    ///
    /// The callback is keyed only on `code`, so no `state` is sent.
    pub fn build_authorize_url(cfg: &MailchimpConfig) -> Result<Url, BridgeError> {
        let url = Url::parse_with_params(
            &cfg.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", cfg.client_id.as_str()),
                ("redirect_uri", cfg.redirect_uri.as_str()),
            ],
        )?;
        Ok(url)
    }

    /// Trade the callback `code` for an access token.
    pub async fn exchange_authorization_code(
        cfg: &MailchimpConfig,
        code: AuthorizationCode,
        http_client: &reqwest::Client,
    ) -> Result<MailchimpTokenResponse, BridgeError> {
        let client = build_oauth2_client(cfg)?;
        let token_result = client
            .exchange_code(code)
            .request_async(http_client)
            .await?;
        debug!(
            expires_in = ?token_result.expires_in(),
            "Authorization code exchanged"
        );
        Ok(token_result)
    }

    /// Fetch the account metadata (login email, API host, data-center) for a token.
    pub async fn fetch_metadata(
        cfg: &MailchimpConfig,
        access_token: &AccessToken,
        http_client: &reqwest::Client,
    ) -> Result<Value, BridgeError> {
        let metadata = http_client
            .get(cfg.metadata_url.as_str())
            .bearer_auth(access_token.secret())
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        info!("Fetch MailChimp metadata successfully");
        Ok(metadata)
    }
}

/// Build the MailChimp OAuth2 client from configuration.
///
/// MailChimp expects the client credentials in the form body of the token
/// request rather than in a Basic header.
fn build_oauth2_client(cfg: &MailchimpConfig) -> Result<MailchimpOauth2Client, BridgeError> {
    let client = OAuth2Client::new(ClientId::new(cfg.client_id.clone()))
        .set_client_secret(ClientSecret::new(cfg.client_secret.clone()))
        .set_token_uri(TokenUrl::new(cfg.token_url.clone())?)
        .set_redirect_uri(RedirectUrl::new(cfg.redirect_uri.clone())?)
        .set_auth_type(AuthType::RequestBody);
    Ok(client)
}

fn bearer_token_type() -> BasicTokenType {
    BasicTokenType::Bearer
}

/// Token endpoint payload. MailChimp omits `token_type` and issues
/// non-expiring tokens (`expires_in: 0`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailchimpTokenResponse {
    access_token: AccessToken,
    #[serde(skip, default = "bearer_token_type")]
    token_type: BasicTokenType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
}

impl TokenResponse for MailchimpTokenResponse {
    type TokenType = BasicTokenType;

    fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    fn token_type(&self) -> &Self::TokenType {
        &self.token_type
    }

    fn expires_in(&self) -> Option<Duration> {
        self.expires_in
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    fn refresh_token(&self) -> Option<&RefreshToken> {
        None
    }

    fn scopes(&self) -> Option<&Vec<Scope>> {
        None
    }
}

pub(super) type MailchimpOauth2Client = OAuth2Client<
    BasicErrorResponse,
    MailchimpTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;
