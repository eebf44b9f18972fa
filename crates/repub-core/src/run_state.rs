//! Single-flight guard and run statistics.
//!
//! One tracker instance is shared by everything that can start a run. It
//! is a two-state machine (idle/running) exposing transition methods only;
//! callers never touch the fields. `force` deliberately re-enters the
//! running state without waiting for the in-flight run: two logical runs
//! then race on the same counters and the last writer wins. That hazard is
//! accepted as an operator escape hatch.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use uuid::Uuid;

use crate::config::schedule_period;
use crate::error::AppError;
use crate::models::{RunStats, RunStatus};

#[derive(Debug, Default)]
struct RunState {
    is_running: bool,
    process_id: Option<Uuid>,
    last_run_at: Option<DateTime<Utc>>,
    total_found: u64,
    total_dispatched: u64,
    error_count: u64,
    total_scanned: u64,
    unpublished_skipped: u64,
}

/// Shared handle to the process-wide run state.
#[derive(Debug, Clone, Default)]
pub struct RunTracker {
    inner: Arc<Mutex<RunState>>,
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle → Running. Fails with [`AppError::AlreadyRunning`] if a run is
    /// active, unless `force` is set. Resets per-run counters and assigns
    /// a fresh process id.
    pub fn begin(&self, force: bool) -> Result<Uuid, AppError> {
        let mut state = self.inner.lock().unwrap();
        if state.is_running && !force {
            return Err(AppError::AlreadyRunning);
        }

        let process_id = Uuid::new_v4();
        state.is_running = true;
        state.process_id = Some(process_id);
        state.total_found = 0;
        state.total_dispatched = 0;
        state.error_count = 0;
        state.total_scanned = 0;
        state.unpublished_skipped = 0;
        Ok(process_id)
    }

    /// Running → Idle after a successful run: record the summary counters
    /// and the completion time, clear the process id.
    pub fn complete(&self, stats: &RunStats) {
        let mut state = self.inner.lock().unwrap();
        state.total_found = stats.total_published_found;
        state.total_dispatched = stats.requests_sent;
        state.total_scanned = stats.total_scanned;
        state.unpublished_skipped = stats.unpublished_skipped;
        state.last_run_at = Some(Utc::now());
        state.is_running = false;
        state.process_id = None;
    }

    /// Running → Idle after a failed run: counters stay as they were set
    /// at run start, only the running flag and process id are cleared.
    pub fn abort(&self) {
        let mut state = self.inner.lock().unwrap();
        state.is_running = false;
        state.process_id = None;
    }

    /// Snapshot for the status endpoint. The next-run estimate is the
    /// naive schedule-token heuristic, not a cron evaluation.
    pub fn status(&self, schedule: Option<&str>) -> RunStatus {
        let state = self.inner.lock().unwrap();
        let next_scheduled_run = state.last_run_at.map(|last| {
            let period = schedule_period(schedule);
            last + ChronoDuration::from_std(period).unwrap_or_else(|_| ChronoDuration::hours(24))
        });

        RunStatus {
            is_running: state.is_running,
            last_run_at: state.last_run_at,
            next_scheduled_run,
            total_found: state.total_found,
            total_dispatched: state.total_dispatched,
            error_count: state.error_count,
            process_id: state.process_id,
            total_scanned: state.total_scanned,
            unpublished_skipped: state.unpublished_skipped,
        }
    }
}
