use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Outcome of parsing one admin listing page.
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    /// Published-ad identifiers found on this page, deduplicated,
    /// in document order.
    pub ad_ids: Vec<String>,
    /// Sections where an identifier was resolved, regardless of status.
    pub total_scanned: u64,
    /// Sections resolved to a published ad.
    pub published_found: u64,
    /// Sections resolved to an identifier but not published.
    pub unpublished_skipped: u64,
    /// Advisory only; pagination does not trust this alone.
    pub likely_has_next_page: bool,
}

/// Union of all pages: the full discovery result.
#[derive(Debug, Clone, Default)]
pub struct CollectedAds {
    /// Deduplicated published-ad identifiers across all pages.
    pub ad_ids: Vec<String>,
    pub total_scanned: u64,
    pub published_found: u64,
    pub unpublished_skipped: u64,
    seen: HashSet<String>,
}

impl CollectedAds {
    /// Fold one page into the accumulator, keeping first-seen order.
    pub fn absorb(&mut self, page: &PageResult) {
        for id in &page.ad_ids {
            if self.seen.insert(id.clone()) {
                self.ad_ids.push(id.clone());
            }
        }
        self.total_scanned += page.total_scanned;
        self.published_found += page.published_found;
        self.unpublished_skipped += page.unpublished_skipped;
    }
}

/// Per-identifier result of a republish attempt.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub ad_id: String,
    /// With failure masking on (the default) this is always true: the
    /// contract is best-effort request issuance, not verified republish.
    pub succeeded: bool,
    pub completed_at: DateTime<Utc>,
}

/// Statistics of one full discovery-and-dispatch run.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub total_published_found: u64,
    pub requests_sent: u64,
    pub total_scanned: u64,
    pub unpublished_skipped: u64,
}

/// Result of `run_republish_all`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub process_id: Uuid,
    pub stats: RunStats,
}

/// Statistics of a run over operator-supplied identifiers.
#[derive(Debug, Clone, Serialize)]
pub struct SpecificRunStats {
    pub total_provided: u64,
    pub requests_sent: u64,
    pub failed: u64,
}

/// Result of `run_republish_specific`.
#[derive(Debug, Clone, Serialize)]
pub struct SpecificRunReport {
    pub process_id: Uuid,
    pub stats: SpecificRunStats,
}

/// Process-wide status snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct RunStatus {
    pub is_running: bool,
    pub last_run_at: Option<DateTime<Utc>>,
    pub next_scheduled_run: Option<DateTime<Utc>>,
    pub total_found: u64,
    pub total_dispatched: u64,
    pub error_count: u64,
    pub process_id: Option<Uuid>,
    pub total_scanned: u64,
    pub unpublished_skipped: u64,
}
