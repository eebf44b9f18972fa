//! Test utilities: a mock fetcher and HTML fixtures for the admin
//! listing template.
//!
//! Handwritten mocks for dependency injection in unit tests, using
//! `Arc<Mutex<_>>` for interior mutability so assertions can inspect
//! recorded calls.

use std::sync::{Arc, Mutex};

use crate::config::{AppConfig, HeaderConfig, RateLimitConfig, SiteConfig};
use crate::error::AppError;
use crate::traits::Fetcher;

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

type Route = (String, Result<String, AppError>);

/// Mock fetcher that routes by URL substring.
///
/// Routes are persistent (not consumed), so repeated fetches of the same
/// page see the same response. URLs with no matching route get a benign
/// empty document. Every call is recorded for assertions.
#[derive(Clone, Default)]
pub struct MockFetcher {
    routes: Arc<Mutex<Vec<Route>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to any URL containing `pattern`. First matching route wins.
    pub fn respond(&self, pattern: &str, response: Result<String, AppError>) {
        self.routes
            .lock()
            .unwrap()
            .push((pattern.to_string(), response));
    }

    /// All fetched URLs, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.calls.lock().unwrap().push(url.to_string());

        let routes = self.routes.lock().unwrap();
        for (pattern, response) in routes.iter() {
            if url.contains(pattern.as_str()) {
                return match response {
                    Ok(body) => Ok(body.clone()),
                    Err(e) => Err(AppError::Generic(e.to_string())),
                };
            }
        }
        Ok("<html><body>ok</body></html>".to_string())
    }
}

// ---------------------------------------------------------------------------
// Config fixtures
// ---------------------------------------------------------------------------

pub fn test_site() -> SiteConfig {
    SiteConfig {
        base_url: "https://clasificados.example.com".into(),
        admin_path: "/micuenta/avisos".into(),
        republish_path: "/republicar".into(),
        cookies: "session=test".into(),
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        site: test_site(),
        headers: HeaderConfig {
            user_agent: "test-agent".into(),
            accept_language: "es-AR,es;q=0.9".into(),
        },
        rate_limit: RateLimitConfig::default(),
        schedule: Some("0 0 */25 * * *".into()),
    }
}

// ---------------------------------------------------------------------------
// HTML fixtures
// ---------------------------------------------------------------------------

/// One ad section in the current listing template, with all identifier
/// markers present.
pub fn ad_section(ad_id: &str, status: &str) -> String {
    format!(
        r#"<div class="item-aviso">
  <div id="itempub{ad_id}" class="publication">
    <input type="checkbox" name="nids[]" value="{ad_id}">
    <div class="tab-label" id="{ad_id}">Aviso</div>
    <h4>N° Aviso:</h4>
    <h4>{ad_id}</h4>
    <small class="m0 bold">Estado:</small><small class="m0 px1">{status}</small>
  </div>
</div>"#
    )
}

/// A full listing page with one published section per id.
pub fn listing_page(ad_ids: &[&str]) -> String {
    let sections: String = ad_ids
        .iter()
        .map(|id| ad_section(id, "Publicado"))
        .collect();
    format!("<html><body><div class=\"listado\">{sections}</div></body></html>")
}

/// A listing page with no ad sections at all.
pub fn empty_page() -> String {
    "<html><body><div class=\"listado\"></div></body></html>".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn routes_match_by_substring_in_order() {
        let fetcher = MockFetcher::new();
        fetcher.respond("page=1", Ok("first".into()));
        fetcher.respond("page=", Ok("fallthrough".into()));

        let body = fetcher.fetch("https://x.test/avisos?page=1").await.unwrap();
        assert_eq!(body, "first");
        let body = fetcher.fetch("https://x.test/avisos?page=9").await.unwrap();
        assert_eq!(body, "fallthrough");
        assert_eq!(fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn unmatched_urls_get_default_document() {
        let fetcher = MockFetcher::new();
        let body = fetcher.fetch("https://x.test/anything").await.unwrap();
        assert!(body.contains("ok"));
    }
}
