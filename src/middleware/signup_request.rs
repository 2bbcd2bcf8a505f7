use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};

use crate::types::mailchimp::SignupForm;

/// Signup fields from either a JSON body or a urlencoded HTML form.
pub struct SignupPayload(pub SignupForm);

impl<S> FromRequest<S> for SignupPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let Json(form) = Json::<SignupForm>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(SignupPayload(form))
        } else {
            let Form(form) = Form::<SignupForm>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(SignupPayload(form))
        }
    }
}
