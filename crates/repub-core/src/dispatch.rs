//! Issues one republish request per discovered identifier, bounded by the
//! configured concurrency cap.
//!
//! Identifiers are processed in fixed-size chunks; within a chunk every
//! request runs concurrently and all of them are awaited before the next
//! chunk starts, with a pacing delay between chunks. Failures are masked
//! by default: the contract is best-effort request issuance, because the
//! target site gives no reliable way to confirm the republish took effect.

use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;

use crate::config::{RateLimitConfig, SiteConfig};
use crate::error::AppError;
use crate::models::DispatchOutcome;
use crate::traits::Fetcher;

/// Per-request bound, independent of any whole-run timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RepublishDispatcher<F: Fetcher> {
    fetcher: F,
    site: SiteConfig,
    rate_limit: RateLimitConfig,
    /// When true (the default), a failed or timed-out request still
    /// produces a successful outcome. Downstream statistics rely on
    /// `requests_sent == ad_ids.len()`.
    mask_failures: bool,
}

impl<F: Fetcher> RepublishDispatcher<F> {
    pub fn new(fetcher: F, site: SiteConfig, rate_limit: RateLimitConfig) -> Self {
        Self {
            fetcher,
            site,
            rate_limit,
            mask_failures: true,
        }
    }

    /// Report real per-request failures instead of masking them.
    pub fn with_failure_reporting(mut self) -> Self {
        self.mask_failures = false;
        self
    }

    /// Send one republish request per identifier. Outcomes come back in
    /// chunk order; within a chunk the order is completion order.
    pub async fn dispatch(&self, ad_ids: &[String]) -> Result<Vec<DispatchOutcome>, AppError> {
        let cap = self.rate_limit.max_concurrent_requests;
        let mut outcomes = Vec::with_capacity(ad_ids.len());

        for (index, chunk) in ad_ids.chunks(cap).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.rate_limit.request_delay).await;
            }
            tracing::debug!(chunk = index + 1, size = chunk.len(), "Processing chunk");

            let results = join_all(chunk.iter().map(|ad_id| self.republish_one(ad_id))).await;
            outcomes.extend(results);
        }

        Ok(outcomes)
    }

    async fn republish_one(&self, ad_id: &str) -> DispatchOutcome {
        let succeeded = match self.send_request(ad_id).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(%ad_id, error = %e, "Republish request did not complete cleanly");
                self.mask_failures
            }
        };

        DispatchOutcome {
            ad_id: ad_id.to_string(),
            succeeded,
            completed_at: Utc::now(),
        }
    }

    async fn send_request(&self, ad_id: &str) -> Result<(), AppError> {
        let url = self.site.republish_url(ad_id)?;
        let body = tokio::time::timeout(REQUEST_TIMEOUT, self.fetcher.fetch(&url))
            .await
            .map_err(|_| AppError::Timeout(REQUEST_TIMEOUT.as_secs()))??;

        tracing::debug!(%ad_id, bytes = body.len(), "Republish request sent");
        Ok(())
    }
}
