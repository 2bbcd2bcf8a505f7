use crate::api::mailchimp_api::{MailchimpApi, UpstreamFailure};
use crate::mailchimp_oauth::credentials::CredentialRecord;
use crate::types::mailchimp::IdentityQuery;
use crate::{BridgeError, router::BridgeState};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;

/// GET /mailchimp/lists?email=... -> the connected account's audiences.
pub async fn lists_handler(
    State(state): State<BridgeState>,
    Query(query): Query<IdentityQuery>,
) -> Result<Response, BridgeError> {
    let record = load_record(&state, &query.email).await?;
    let url = record.lists_url()?;
    Ok(relay(&state, url.as_str(), &record.access_token, "lists").await)
}

/// GET /mailchimp/list/members/{id}?email=... -> members of one audience.
pub async fn members_handler(
    State(state): State<BridgeState>,
    Path(list_id): Path<String>,
    Query(query): Query<IdentityQuery>,
) -> Result<Response, BridgeError> {
    let record = load_record(&state, &query.email).await?;
    let url = record.members_url(&list_id)?;
    Ok(relay(&state, url.as_str(), &record.access_token, "members").await)
}

async fn load_record(state: &BridgeState, email: &str) -> Result<CredentialRecord, BridgeError> {
    state
        .store
        .get(email)
        .await?
        .ok_or_else(|| BridgeError::NotConnected(email.to_string()))
}

async fn relay(state: &BridgeState, url: &str, access_token: &str, field: &str) -> Response {
    match MailchimpApi::get_field(&state.client, url, access_token, field).await {
        Ok(value) => Json(value).into_response(),
        Err(failure) => {
            match &failure {
                UpstreamFailure::Status { status, .. } => {
                    warn!(url, status = %status, "MailChimp rejected proxied request")
                }
                UpstreamFailure::Transport(e) => {
                    warn!(url, error = %e, "MailChimp proxied request failed")
                }
            }
            (StatusCode::INTERNAL_SERVER_ERROR, Json(failure.payload())).into_response()
        }
    }
}
