use crate::config::Config;
use crate::error::BridgeError;
use crate::handlers::mailchimp_lists::{lists_handler, members_handler};
use crate::handlers::mailchimp_oauth::{mailchimp_oauth_callback, mailchimp_oauth_entry};
use crate::handlers::signup::signup_handler;
use crate::service::credentials_actor::CredentialsHandle;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;

/// Shared handles for every route: configuration, the outbound HTTP client
/// and the credential store.
#[derive(Clone)]
pub struct BridgeState {
    pub cfg: Arc<Config>,
    pub client: reqwest::Client,
    pub store: CredentialsHandle,
}

impl BridgeState {
    pub fn new(cfg: Arc<Config>, store: CredentialsHandle) -> Result<Self, BridgeError> {
        let client = build_http_client(&cfg)?;
        Ok(Self { cfg, client, store })
    }
}

/// One client for all provider calls. Redirects are not followed so the
/// token endpoint cannot bounce credentials elsewhere. Only connecting is
/// bounded; an established request waits for the provider however long it takes.
fn build_http_client(cfg: &Config) -> Result<reqwest::Client, BridgeError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("mailbridge/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(5))
        .redirect(reqwest::redirect::Policy::none());
    if let Some(proxy_url) = cfg.basic.proxy.as_ref() {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }
    Ok(builder.build()?)
}

pub fn bridge_router(state: BridgeState) -> Router {
    let assets = ServeDir::new(&state.cfg.basic.static_dir);

    Router::new()
        .route("/signup", post(signup_handler))
        .route("/mailchimp/auth/authorize", get(mailchimp_oauth_entry))
        .route("/mailchimp/auth/callback", get(mailchimp_oauth_callback))
        .route("/mailchimp/lists", get(lists_handler))
        .route("/mailchimp/list/members/{id}", get(members_handler))
        .fallback_service(assets)
        .with_state(state)
}
