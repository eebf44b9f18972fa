//! Wire-format types. Field names follow the camelCase convention the
//! existing API consumers already depend on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use repub_core::models::{RunStats, RunStatus, SpecificRunStats};

// ---------------------------------------------------------------------------
// Republish
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepublishRequest {
    #[serde(default)]
    pub force_run: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepublishAllResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub process_id: Uuid,
    pub stats: RunStatsBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatsBody {
    pub total_published_ads_found: u64,
    pub requests_sent: u64,
    pub total_ads_scanned: u64,
    pub unpublished_ads_skipped: u64,
}

impl From<RunStats> for RunStatsBody {
    fn from(stats: RunStats) -> Self {
        Self {
            total_published_ads_found: stats.total_published_found,
            requests_sent: stats.requests_sent,
            total_ads_scanned: stats.total_scanned,
            unpublished_ads_skipped: stats.unpublished_skipped,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepublishByIdsRequest {
    pub ad_ids: Vec<String>,
    #[serde(default)]
    pub force_run: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepublishByIdsResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub process_id: Uuid,
    pub stats: SpecificStatsBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificStatsBody {
    pub total_ads_provided: u64,
    pub requests_sent: u64,
    pub failed: u64,
}

impl From<SpecificRunStats> for SpecificStatsBody {
    fn from(stats: SpecificRunStats) -> Self {
        Self {
            total_ads_provided: stats.total_provided,
            requests_sent: stats.requests_sent,
            failed: stats.failed,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub is_running: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub next_scheduled_run: Option<DateTime<Utc>>,
    pub total_ads_found: u64,
    pub ads_republished: u64,
    pub errors: u64,
    pub process_id: Option<Uuid>,
    pub total_ads_scanned: u64,
    pub unpublished_ads_skipped: u64,
}

impl From<RunStatus> for StatusResponse {
    fn from(status: RunStatus) -> Self {
        Self {
            is_running: status.is_running,
            last_run: status.last_run_at,
            next_scheduled_run: status.next_scheduled_run,
            total_ads_found: status.total_found,
            ads_republished: status.total_dispatched,
            errors: status.error_count,
            process_id: status.process_id,
            total_ads_scanned: status.total_scanned,
            unpublished_ads_skipped: status.unpublished_skipped,
        }
    }
}

// ---------------------------------------------------------------------------
// Ads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdsListResponse {
    pub ad_ids: Vec<String>,
    pub total_count: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdsCountResponse {
    pub count: usize,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
