use repub_core::{Fetcher, RepublishService};

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
///
/// Generic over the [`Fetcher`] so integration tests can run the full
/// router against a mock without real HTTP.
pub struct AppState<F: Fetcher> {
    pub service: RepublishService<F>,
}
