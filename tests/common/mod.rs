#![allow(dead_code)]

use axum::{Router, body::to_bytes, response::Response};
use mailbridge::config::{Config, MailchimpConfig};
use mailbridge::router::{BridgeState, bridge_router};
use mailbridge::service::credentials_actor::{self, CredentialsHandle};
use std::sync::Arc;

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
pub const API_KEY: &str = "key-us14";
pub const LIST_ID: &str = "list123";

/// Config with every provider endpoint pointed at `provider_uri`.
pub fn test_config(provider_uri: &str) -> Config {
    let mut cfg = Config::default();
    cfg.basic.static_dir = std::env::temp_dir().join("mailbridge-test-views");
    cfg.mailchimp = MailchimpConfig {
        list_id: LIST_ID.to_string(),
        api_key: API_KEY.to_string(),
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        token_url: format!("{provider_uri}/oauth2/token"),
        metadata_url: format!("{provider_uri}/oauth2/metadata"),
        api_base_url: Some(format!("{provider_uri}/3.0")),
        ..MailchimpConfig::default()
    };
    cfg
}

pub async fn app(provider_uri: &str) -> (Router, CredentialsHandle) {
    let store = credentials_actor::spawn()
        .await
        .expect("failed to spawn credential store");
    let state = BridgeState::new(Arc::new(test_config(provider_uri)), store.clone())
        .expect("failed to build state");
    (bridge_router(state), store)
}

pub async fn body_string(resp: Response) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}

pub async fn body_json(resp: Response) -> serde_json::Value {
    let text = body_string(resp).await;
    serde_json::from_str(&text).expect("response body was not JSON")
}
