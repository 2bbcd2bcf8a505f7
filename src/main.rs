use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Arc::new(mailbridge::config::Config::load()?);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        listen_addr = %cfg.basic.listen_addr,
        static_dir = %cfg.basic.static_dir.display(),
        proxy = %cfg.basic.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        loglevel = %cfg.basic.loglevel,
        instance = %cfg.mailchimp.instance,
        list_id = %cfg.mailchimp.list_id,
        redirect_uri = %cfg.mailchimp.redirect_uri
    );

    if cfg.mailchimp.client_id.is_empty() || cfg.mailchimp.client_secret.is_empty() {
        warn!("MailChimp OAuth client credentials are not configured; account connection will fail");
    }
    if cfg.mailchimp.api_key.is_empty() || cfg.mailchimp.list_id.is_empty() {
        warn!("MailChimp API key or list id is not configured; signups will fail");
    }

    let store = mailbridge::service::credentials_actor::spawn().await?;

    let state = mailbridge::router::BridgeState::new(cfg.clone(), store)?;
    let app = mailbridge::router::bridge_router(state);

    let listener = TcpListener::bind(cfg.basic.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
