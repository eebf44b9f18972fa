use std::time::Duration;

use repub_core::config::{HeaderConfig, SiteConfig};
use repub_core::error::AppError;
use repub_core::traits::Fetcher;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Default per-fetch timeout; listing pages are slow but bounded.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP fetcher using reqwest.
///
/// Every request carries the authenticated session cookie plus a
/// browser-shaped header set (the admin site serves a different, useless
/// template to anything that does not look like a real browser). The
/// referer is pinned to the admin listing page.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestFetcher {
    pub fn new(site: &SiteConfig, headers: &HeaderConfig) -> Result<Self, AppError> {
        Self::with_timeout(site, headers, FETCH_TIMEOUT)
    }

    pub fn with_timeout(
        site: &SiteConfig,
        headers: &HeaderConfig,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(headers.user_agent.clone())
            .default_headers(default_headers(site, headers)?)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpError(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))
    }
}

fn default_headers(site: &SiteConfig, headers: &HeaderConfig) -> Result<HeaderMap, AppError> {
    let mut map = HeaderMap::new();

    let mut insert = |name: &'static str, value: &str| -> Result<(), AppError> {
        let value = HeaderValue::from_str(value)
            .map_err(|e| AppError::ConfigError(format!("Invalid value for header {name}: {e}")))?;
        map.insert(HeaderName::from_static(name), value);
        Ok(())
    };

    insert(
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,\
         image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
    )?;
    insert("accept-language", &headers.accept_language)?;
    insert("cache-control", "no-cache")?;
    insert("cookie", &site.cookies)?;
    insert("pragma", "no-cache")?;
    insert("referer", &site.admin_url())?;
    insert("upgrade-insecure-requests", "1")?;

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use repub_core::testutil::test_site;

    fn test_headers() -> HeaderConfig {
        HeaderConfig {
            user_agent: "test-agent".into(),
            accept_language: "es-AR,es;q=0.9".into(),
        }
    }

    #[test]
    fn builds_client_with_session_headers() {
        let fetcher = ReqwestFetcher::new(&test_site(), &test_headers());
        assert!(fetcher.is_ok());
    }

    #[test]
    fn header_map_pins_cookie_and_referer() {
        let map = default_headers(&test_site(), &test_headers()).unwrap();
        assert_eq!(map.get("cookie").unwrap(), "session=test");
        assert_eq!(
            map.get("referer").unwrap(),
            "https://clasificados.example.com/micuenta/avisos"
        );
        assert_eq!(map.get("accept-language").unwrap(), "es-AR,es;q=0.9");
    }

    #[test]
    fn rejects_cookie_with_control_characters() {
        let mut site = test_site();
        site.cookies = "bad\nvalue".into();
        let result = default_headers(&site, &test_headers());
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
