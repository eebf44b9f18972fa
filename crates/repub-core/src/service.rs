//! Orchestrates the full republish cycle: discovery (pagination) followed
//! by dispatch (one republish request per ad), guarded by the run tracker.
//!
//! Generic over the [`Fetcher`] so the whole pipeline runs against mocks
//! in tests without real HTTP.

use crate::config::AppConfig;
use crate::collector::PageSetCollector;
use crate::dispatch::RepublishDispatcher;
use crate::error::AppError;
use crate::models::{RunReport, RunStats, RunStatus, SpecificRunReport, SpecificRunStats};
use crate::run_state::RunTracker;
use crate::traits::Fetcher;

pub struct RepublishService<F: Fetcher> {
    collector: PageSetCollector<F>,
    dispatcher: RepublishDispatcher<F>,
    tracker: RunTracker,
    schedule: Option<String>,
}

impl<F: Fetcher> RepublishService<F> {
    pub fn new(fetcher: F, config: AppConfig) -> Self {
        let collector = PageSetCollector::new(
            fetcher.clone(),
            config.site.clone(),
            config.rate_limit.clone(),
        );
        let dispatcher = RepublishDispatcher::new(fetcher, config.site, config.rate_limit);
        Self {
            collector,
            dispatcher,
            tracker: RunTracker::new(),
            schedule: config.schedule,
        }
    }

    /// Handle to the shared run state (one tracker per service instance).
    pub fn tracker(&self) -> &RunTracker {
        &self.tracker
    }

    /// Discover the currently published ad ids without dispatching.
    pub async fn list_published_ad_ids(&self) -> Result<Vec<String>, AppError> {
        let collected = self.collector.collect().await?;
        Ok(collected.ad_ids)
    }

    pub async fn count_published_ads(&self) -> Result<usize, AppError> {
        Ok(self.list_published_ad_ids().await?.len())
    }

    /// One full run: discover all published ads, then republish each of
    /// them. Fails with [`AppError::AlreadyRunning`] when a run is active
    /// and `force` is false.
    pub async fn run_republish_all(&self, force: bool) -> Result<RunReport, AppError> {
        let process_id = self.tracker.begin(force)?;
        tracing::info!(%process_id, "Starting republish process");

        match self.discover_and_dispatch().await {
            Ok(stats) => {
                self.tracker.complete(&stats);
                tracing::info!(
                    %process_id,
                    requests_sent = stats.requests_sent,
                    "Republish process completed"
                );
                Ok(RunReport { process_id, stats })
            }
            Err(e) => {
                tracing::error!(%process_id, error = %e, "Republish process failed");
                self.tracker.abort();
                Err(e)
            }
        }
    }

    /// Republish only the given ids, skipping discovery entirely.
    pub async fn run_republish_specific(
        &self,
        ad_ids: &[String],
        force: bool,
    ) -> Result<SpecificRunReport, AppError> {
        if ad_ids.is_empty() {
            return Err(AppError::InvalidRequest(
                "At least one ad id must be provided".into(),
            ));
        }

        let process_id = self.tracker.begin(force)?;
        tracing::info!(%process_id, count = ad_ids.len(), "Starting specific republish process");

        match self.dispatcher.dispatch(ad_ids).await {
            Ok(outcomes) => {
                let requests_sent = outcomes.len() as u64;
                let failed = outcomes.iter().filter(|o| !o.succeeded).count() as u64;
                self.tracker.complete(&RunStats {
                    total_published_found: ad_ids.len() as u64,
                    requests_sent,
                    total_scanned: 0,
                    unpublished_skipped: 0,
                });
                Ok(SpecificRunReport {
                    process_id,
                    stats: SpecificRunStats {
                        total_provided: ad_ids.len() as u64,
                        requests_sent,
                        failed,
                    },
                })
            }
            Err(e) => {
                tracing::error!(%process_id, error = %e, "Specific republish process failed");
                self.tracker.abort();
                Err(e)
            }
        }
    }

    pub fn status(&self) -> RunStatus {
        self.tracker.status(self.schedule.as_deref())
    }

    async fn discover_and_dispatch(&self) -> Result<RunStats, AppError> {
        let collected = self.collector.collect().await?;
        tracing::info!(
            found = collected.ad_ids.len(),
            "Scraper found published ads ready for republishing"
        );

        if collected.ad_ids.is_empty() {
            tracing::warn!("No published ads found to republish");
            return Ok(RunStats {
                total_published_found: 0,
                requests_sent: 0,
                total_scanned: collected.total_scanned,
                unpublished_skipped: collected.unpublished_skipped,
            });
        }

        let outcomes = self.dispatcher.dispatch(&collected.ad_ids).await?;

        Ok(RunStats {
            total_published_found: collected.ad_ids.len() as u64,
            requests_sent: outcomes.len() as u64,
            total_scanned: collected.total_scanned,
            unpublished_skipped: collected.unpublished_skipped,
        })
    }
}
