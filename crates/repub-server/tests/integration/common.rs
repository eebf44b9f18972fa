use std::sync::Arc;

use axum::Router;

use repub_core::RepublishService;
use repub_core::testutil::{MockFetcher, empty_page, listing_page, test_config};
use repub_server::routes;
use repub_server::state::AppState;

pub struct TestApp {
    pub router: Router,
    pub fetcher: MockFetcher,
    pub state: Arc<AppState<MockFetcher>>,
}

/// Build the full router backed by a mock fetcher.
pub fn setup_test_app() -> TestApp {
    let fetcher = MockFetcher::new();
    let state = Arc::new(AppState {
        service: RepublishService::new(fetcher.clone(), test_config()),
    });

    TestApp {
        router: routes::router(state.clone()),
        fetcher,
        state,
    }
}

/// Seed the mock with one listing page of ads and empty pages after it.
pub fn seed_listing(fetcher: &MockFetcher, ids: &[&str]) {
    fetcher.respond("page=1", Ok(listing_page(ids)));
    for page in 2..=5u32 {
        fetcher.respond(&format!("page={page}"), Ok(empty_page()));
    }
}
