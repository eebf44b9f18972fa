use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use chrono::Utc;

use repub_core::Fetcher;

use crate::dto::{
    AdsCountResponse, AdsListResponse, HealthResponse, RepublishAllResponse, RepublishByIdsRequest,
    RepublishByIdsResponse, RepublishRequest, StatusResponse,
};
use crate::error::ApiError;
use crate::state::AppState;

const SERVICE_NAME: &str = "repub-server";

/// Build the full router with all routes.
pub fn router<F: Fetcher + 'static>(state: Arc<AppState<F>>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ads/list", get(ads_list))
        .route("/ads/count", get(ads_count))
        .route("/republish/all", post(republish_all))
        .route("/republish/specific", post(republish_specific))
        .route("/republish/status", get(republish_status))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Republish
// ---------------------------------------------------------------------------

pub async fn republish_all<F: Fetcher + 'static>(
    State(state): State<Arc<AppState<F>>>,
    body: Option<axum::Json<RepublishRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    // The body is optional; a bare POST means a normal, unforced run.
    let force = body.map(|b| b.force_run).unwrap_or(false);
    tracing::info!(force, "Manual republish all triggered");

    let report = state.service.run_republish_all(force).await?;

    let response = RepublishAllResponse {
        message: "Republishing process completed".to_string(),
        timestamp: Utc::now(),
        process_id: report.process_id,
        stats: report.stats.into(),
    };

    Ok(axum::Json(response))
}

pub async fn republish_specific<F: Fetcher + 'static>(
    State(state): State<Arc<AppState<F>>>,
    axum::Json(body): axum::Json<RepublishByIdsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(
        count = body.ad_ids.len(),
        "Manual republish of specific ads triggered"
    );

    let report = state
        .service
        .run_republish_specific(&body.ad_ids, body.force_run)
        .await?;

    let response = RepublishByIdsResponse {
        message: format!(
            "Republishing process completed for {} specific ads",
            body.ad_ids.len()
        ),
        timestamp: Utc::now(),
        process_id: report.process_id,
        stats: report.stats.into(),
    };

    Ok(axum::Json(response))
}

pub async fn republish_status<F: Fetcher + 'static>(
    State(state): State<Arc<AppState<F>>>,
) -> axum::Json<StatusResponse> {
    axum::Json(state.service.status().into())
}

// ---------------------------------------------------------------------------
// Ads
// ---------------------------------------------------------------------------

pub async fn ads_list<F: Fetcher + 'static>(
    State(state): State<Arc<AppState<F>>>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Fetching ads list");
    let ad_ids = state.service.list_published_ad_ids().await?;

    let response = AdsListResponse {
        total_count: ad_ids.len(),
        ad_ids,
        timestamp: Utc::now(),
    };

    Ok(axum::Json(response))
}

pub async fn ads_count<F: Fetcher + 'static>(
    State(state): State<Arc<AppState<F>>>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Fetching ads count");
    let count = state.service.count_published_ads().await?;

    let response = AdsCountResponse {
        count,
        timestamp: Utc::now(),
    };

    Ok(axum::Json(response))
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

pub async fn root() -> &'static str {
    "Republisher API is running"
}

pub async fn health() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        service: SERVICE_NAME,
    })
}
