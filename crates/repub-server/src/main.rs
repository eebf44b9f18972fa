use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use repub_client::ReqwestFetcher;
use repub_core::config::schedule_period;
use repub_core::{AppConfig, RepublishService};
use repub_server::state::AppState;
use repub_server::{routes, scheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("repub=info".parse()?))
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");

    let schedule = config.schedule.clone();
    let fetcher = ReqwestFetcher::new(&config.site, &config.headers)?;
    let state = Arc::new(AppState {
        service: RepublishService::new(fetcher, config),
    });

    let cancel_token = CancellationToken::new();
    let scheduler_handle = schedule.as_deref().map(|s| {
        let period = schedule_period(Some(s));
        tracing::info!(schedule = s, period_secs = period.as_secs(), "Periodic runs enabled");
        scheduler::spawn(state.clone(), period, cancel_token.clone())
    });

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancel_token.cancel();
    if let Some(handle) = scheduler_handle {
        handle.await?;
    }

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    tracing::info!("Shutdown signal received");
}
