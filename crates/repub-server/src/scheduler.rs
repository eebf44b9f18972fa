//! Periodic trigger: runs a full republish cycle every schedule period
//! until the cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use repub_core::{AppError, Fetcher};

use crate::state::AppState;

pub fn spawn<F: Fetcher + 'static>(
    state: Arc<AppState<F>>,
    period: Duration,
    cancel_token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(period_secs = period.as_secs(), "Scheduler started");

        loop {
            tokio::select! {
                () = tokio::time::sleep(period) => {}
                () = cancel_token.cancelled() => break,
            }

            match state.service.run_republish_all(false).await {
                Ok(report) => tracing::info!(
                    process_id = %report.process_id,
                    requests_sent = report.stats.requests_sent,
                    "Scheduled republish run completed"
                ),
                Err(AppError::AlreadyRunning) => {
                    tracing::warn!("Skipping scheduled run, a process is already active");
                }
                Err(e) => tracing::error!(error = %e, "Scheduled republish run failed"),
            }
        }

        tracing::info!("Scheduler stopped");
    })
}
