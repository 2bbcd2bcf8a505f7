use crate::api::mailchimp_api::MailchimpApi;
use crate::middleware::signup_request::SignupPayload;
use crate::router::BridgeState;
use crate::types::mailchimp::NewMember;
use axum::extract::State;
use tracing::info;

pub const SIGNUP_SUCCEEDED: &str = "Sign Up Successfully";
pub const SIGNUP_FAILED: &str = "Sign Up Failed";

/// POST /signup -> subscribes the posted address to the configured list.
pub async fn signup_handler(
    State(state): State<BridgeState>,
    SignupPayload(form): SignupPayload,
) -> &'static str {
    let member = NewMember::from(form);
    let outcome = MailchimpApi::add_member(&state.client, &state.cfg.mailchimp, &member).await;
    info!(
        list_id = %state.cfg.mailchimp.list_id,
        outcome = ?outcome,
        "signup processed"
    );

    if outcome.is_success() {
        SIGNUP_SUCCEEDED
    } else {
        SIGNUP_FAILED
    }
}
