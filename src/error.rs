use axum::{Json, http::StatusCode, response::IntoResponse};
use oauth2::basic::BasicErrorResponseType;
use oauth2::reqwest::Error as ReqwestClientError;
use oauth2::{HttpClientError, RequestTokenError, StandardErrorResponse};
use serde::Serialize;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum BridgeError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing `code` in OAuth callback")]
    MissingAuthorizationCode,

    #[error("OAuth2 token request error: {0}")]
    Oauth2Token(String),

    #[error("OAuth2 server error: {error}")]
    Oauth2Server { error: String },

    #[error("missing login.email in metadata response")]
    MissingEmailInMetadata,

    #[error("missing api_endpoint in metadata response")]
    MissingApiEndpoint,

    #[error("api_endpoint is not a base URL: {0}")]
    InvalidApiEndpoint(String),

    #[error("no MailChimp account connected for {0}")]
    NotConnected(String),

    #[error("Credential store error: {0}")]
    StoreUnavailable(String),
}

impl
    From<
        RequestTokenError<
            HttpClientError<ReqwestClientError>,
            StandardErrorResponse<BasicErrorResponseType>,
        >,
    > for BridgeError
{
    fn from(
        e: RequestTokenError<
            HttpClientError<ReqwestClientError>,
            StandardErrorResponse<BasicErrorResponseType>,
        >,
    ) -> Self {
        match e {
            RequestTokenError::ServerResponse(err) => BridgeError::Oauth2Server {
                error: err.error().to_string(),
            },
            RequestTokenError::Request(req_e) => {
                BridgeError::Oauth2Token(format!("request failed: {}", req_e))
            }
            RequestTokenError::Parse(parse_err, _body) => BridgeError::Json(parse_err.into_inner()),
            RequestTokenError::Other(s) => BridgeError::Oauth2Token(s),
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            BridgeError::NotConnected(email) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_CONNECTED".to_string(),
                    message: format!("No MailChimp account is connected for {email}."),
                },
            ),
            BridgeError::MissingAuthorizationCode => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "BAD_REQUEST".to_string(),
                    message: "Missing authorization code.".to_string(),
                },
            ),
            BridgeError::StoreUnavailable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                },
            ),
            BridgeError::Json(_)
            | BridgeError::Oauth2Token(_)
            | BridgeError::Oauth2Server { .. }
            | BridgeError::MissingEmailInMetadata
            | BridgeError::MissingApiEndpoint
            | BridgeError::InvalidApiEndpoint(_) => (
                StatusCode::BAD_GATEWAY,
                ApiErrorBody {
                    code: "UPSTREAM_INVALID_RESPONSE".to_string(),
                    message: "MailChimp returned an unusable response.".to_string(),
                },
            ),
            BridgeError::Reqwest(_) | BridgeError::UrlParse(_) => (
                StatusCode::BAD_GATEWAY,
                ApiErrorBody {
                    code: "BAD_GATEWAY".to_string(),
                    message: "Upstream service is unavailable.".to_string(),
                },
            ),
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
