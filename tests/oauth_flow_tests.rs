mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header::LOCATION},
};
use mailbridge::mailchimp_oauth::service::{
    METADATA_FETCH_FAILED, METADATA_MISSING_EMAIL, TOKEN_EXCHANGE_FAILED,
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

async fn mount_token_ok(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc"))
        .and(body_string_contains("client_id=client-id"))
        .and(body_string_contains("client_secret=client-secret"))
        .and(body_string_contains("redirect_uri="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "expires_in": 0,
            "scope": null
        })))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn authorize_redirects_to_provider_with_code_flow_params() {
    let server = MockServer::start().await;
    let (app, _store) = common::app(&server.uri()).await;

    let resp = app
        .oneshot(get("/mailchimp/auth/authorize?response_type=token&client_id=evil"))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = resp
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("missing Location header")
        .to_string();
    assert!(location.starts_with(mailbridge::config::MAILCHIMP_AUTHORIZE_URL));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("client_id=client-id"));
    assert!(!location.contains("evil"));
    assert!(!location.contains("state="));
}

#[tokio::test]
async fn callback_exchanges_fetches_metadata_then_saves() {
    let server = MockServer::start().await;
    mount_token_ok(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/oauth2/metadata"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dc": "us1",
            "accountname": "Acme",
            "login": { "email": "u@example.com", "login_id": 7 },
            "api_endpoint": server.uri()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, store) = common::app(&server.uri()).await;
    let resp = app
        .oneshot(get("/mailchimp/auth/callback?code=abc"))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(LOCATION).unwrap(),
        "/pick-a-list.html?email=u%40example.com"
    );

    let record = store
        .get("u@example.com")
        .await
        .unwrap()
        .expect("record was not saved");
    assert_eq!(record.access_token, "tok");
    assert_eq!(record.api_endpoint, format!("{}/3.0", server.uri()));
    assert_eq!(record.metadata.get("accountname"), Some(&json!("Acme")));
    assert_eq!(store.len().await.unwrap(), 1);

    let requests = server.received_requests().await.expect("recording disabled");
    let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
    assert_eq!(paths, vec!["/oauth2/token", "/oauth2/metadata"]);
}

#[tokio::test]
async fn token_failure_skips_metadata_and_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid authorization code"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oauth2/metadata"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (app, store) = common::app(&server.uri()).await;
    let resp = app
        .oneshot(get("/mailchimp/auth/callback?code=abc"))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(common::body_string(resp).await, TOKEN_EXCHANGE_FAILED);
    assert!(store.is_empty().await.unwrap());
}

#[tokio::test]
async fn metadata_failure_never_writes_the_store() {
    let server = MockServer::start().await;
    mount_token_ok(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/oauth2/metadata"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_token"})))
        .expect(1)
        .mount(&server)
        .await;

    let (app, store) = common::app(&server.uri()).await;
    let resp = app
        .oneshot(get("/mailchimp/auth/callback?code=abc"))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(common::body_string(resp).await, METADATA_FETCH_FAILED);
    assert!(store.is_empty().await.unwrap());
}

#[tokio::test]
async fn metadata_without_login_email_is_reported() {
    let server = MockServer::start().await;
    mount_token_ok(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/oauth2/metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dc": "us1",
            "login": {},
            "api_endpoint": server.uri()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, store) = common::app(&server.uri()).await;
    let resp = app
        .oneshot(get("/mailchimp/auth/callback?code=abc"))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(common::body_string(resp).await, METADATA_MISSING_EMAIL);
    assert!(store.is_empty().await.unwrap());
}

#[tokio::test]
async fn callback_without_code_makes_no_provider_calls() {
    let server = MockServer::start().await;
    mount_token_ok(&server, 0).await;

    let (app, store) = common::app(&server.uri()).await;
    let resp = app
        .oneshot(get("/mailchimp/auth/callback"))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::body_string(resp).await, TOKEN_EXCHANGE_FAILED);
    assert!(store.is_empty().await.unwrap());
}

#[tokio::test]
async fn reconnecting_overwrites_the_previous_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("code=first"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok-1"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("code=second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok-2"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oauth2/metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": { "email": "u@example.com" },
            "api_endpoint": server.uri()
        })))
        .mount(&server)
        .await;

    let (app, store) = common::app(&server.uri()).await;
    for code in ["first", "second"] {
        let resp = app
            .clone()
            .oneshot(get(&format!("/mailchimp/auth/callback?code={code}")))
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::FOUND);
    }

    assert_eq!(store.len().await.unwrap(), 1);
    let record = store.get("u@example.com").await.unwrap().unwrap();
    assert_eq!(record.access_token, "tok-2");
}
