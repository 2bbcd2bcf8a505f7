use crate::config::PICK_A_LIST_PAGE;
use crate::mailchimp_oauth::endpoints::MailchimpOauthEndpoints;
use crate::mailchimp_oauth::service::MailchimpOauthService;
use crate::types::mailchimp::AuthCallbackQuery;
use crate::{BridgeError, router::BridgeState};
use axum::{
    extract::{Query, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

/// GET /mailchimp/auth/authorize -> redirects to MailChimp's consent page.
pub async fn mailchimp_oauth_entry(
    State(state): State<BridgeState>,
) -> Result<Response, BridgeError> {
    let auth_url = MailchimpOauthEndpoints::build_authorize_url(&state.cfg.mailchimp)?;
    info!("Dispatching OAuth redirect");
    Ok(found(auth_url.as_str()))
}

/// GET /mailchimp/auth/callback -> exchanges the code, stores the account and
/// sends the browser on to the list picker.
pub async fn mailchimp_oauth_callback(
    State(state): State<BridgeState>,
    Query(query): Query<AuthCallbackQuery>,
) -> Response {
    let connected = MailchimpOauthService::connect_account(
        &state.cfg.mailchimp,
        query.code.as_deref(),
        &state.client,
        &state.store,
    )
    .await;

    match connected {
        Ok(record) => {
            let target = format!(
                "{}?{}",
                PICK_A_LIST_PAGE,
                url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("email", &record.identity)
                    .finish()
            );
            found(&target)
        }
        Err(err) => {
            warn!(stage = ?err.stage, error = %err.source, "MailChimp OAuth callback failed");
            (err.status(), err.user_message()).into_response()
        }
    }
}

/// `302 Found` with a `Location` header.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}
