use std::future::Future;

use crate::error::AppError;

/// Fetches the body of a URL as text.
///
/// Both the admin listing pages and the republish endpoint are plain GET
/// requests against the same authenticated site, so a single capability
/// covers them. Session cookie, user-agent, and referer are the
/// implementation's concern (see `repub-client`).
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}
