use std::time::Duration;

use crate::error::AppError;

/// Target-site endpoints and session credentials.
///
/// All values come from the environment; nothing about the site is
/// hard-coded so the same binary can point at staging or production.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// e.g. `https://clasificados.example.com`
    pub base_url: String,
    /// Path of the admin listing page, e.g. `/micuenta/avisos`
    pub admin_path: String,
    /// Path segment appended for a republish request, e.g. `/republicar`
    pub republish_path: String,
    /// Raw cookie header value carrying the authenticated session.
    pub cookies: String,
}

impl SiteConfig {
    /// URL of the admin listing page (also used as referer).
    pub fn admin_url(&self) -> String {
        format!("{}{}", self.base_url, self.admin_path)
    }

    /// URL of one page of the admin listing.
    pub fn page_url(&self, page: u32) -> Result<String, AppError> {
        let url = format!("{}{}?page={page}", self.base_url, self.admin_path);
        url::Url::parse(&url)
            .map_err(|e| AppError::ConfigError(format!("Invalid page URL '{url}': {e}")))?;
        Ok(url)
    }

    /// URL that triggers a republish of one ad.
    pub fn republish_url(&self, ad_id: &str) -> Result<String, AppError> {
        let url = format!(
            "{}{}{}/{ad_id}",
            self.base_url, self.admin_path, self.republish_path
        );
        url::Url::parse(&url)
            .map_err(|e| AppError::ConfigError(format!("Invalid republish URL '{url}': {e}")))?;
        Ok(url)
    }
}

/// Browser-style request headers sent with every request.
#[derive(Debug, Clone)]
pub struct HeaderConfig {
    pub user_agent: String,
    pub accept_language: String,
}

/// Outbound request pacing.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum number of in-flight republish requests (chunk size).
    pub max_concurrent_requests: usize,
    /// Pause between consecutive chunks.
    pub request_delay: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 20,
            request_delay: Duration::from_millis(300),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub headers: HeaderConfig,
    pub rate_limit: RateLimitConfig,
    /// Cron-style schedule string, e.g. `0 0 */25 * * *`. None disables
    /// the periodic trigger.
    pub schedule: Option<String>,
}

impl AppConfig {
    /// Read configuration from environment variables.
    ///
    /// Required: `CLASIFICADOS_BASE_URL`, `CLASIFICADOS_ADMIN_PATH`,
    /// `CLASIFICADOS_REPUBLISH_PATH`, `CLASIFICADOS_COOKIES`.
    ///
    /// Optional: `USER_AGENT`, `ACCEPT_LANGUAGE`,
    /// `MAX_CONCURRENT_REQUESTS` (default 20), `REQUEST_DELAY_MS`
    /// (default 300), `CRON_SCHEDULE`.
    pub fn from_env() -> Result<Self, AppError> {
        let base_url = require_env("CLASIFICADOS_BASE_URL")?;
        url::Url::parse(&base_url).map_err(|e| {
            AppError::ConfigError(format!("Invalid CLASIFICADOS_BASE_URL '{base_url}': {e}"))
        })?;

        let site = SiteConfig {
            base_url,
            admin_path: require_env("CLASIFICADOS_ADMIN_PATH")?,
            republish_path: require_env("CLASIFICADOS_REPUBLISH_PATH")?,
            cookies: require_env("CLASIFICADOS_COOKIES")?,
        };

        let headers = HeaderConfig {
            user_agent: std::env::var("USER_AGENT").unwrap_or_else(|_| {
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/137.0.0.0 Safari/537.36"
                    .to_string()
            }),
            accept_language: std::env::var("ACCEPT_LANGUAGE")
                .unwrap_or_else(|_| "es-AR,es;q=0.9,en;q=0.8".to_string()),
        };

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            max_concurrent_requests: parse_env(
                "MAX_CONCURRENT_REQUESTS",
                defaults.max_concurrent_requests,
            )?,
            request_delay: Duration::from_millis(parse_env(
                "REQUEST_DELAY_MS",
                defaults.request_delay.as_millis() as u64,
            )?),
        };
        if rate_limit.max_concurrent_requests == 0 {
            return Err(AppError::ConfigError(
                "MAX_CONCURRENT_REQUESTS must be at least 1".into(),
            ));
        }

        Ok(Self {
            site,
            headers,
            rate_limit,
            schedule: std::env::var("CRON_SCHEDULE").ok(),
        })
    }
}

fn require_env(name: &str) -> Result<String, AppError> {
    std::env::var(name).map_err(|_| AppError::ConfigError(format!("{name} not set")))
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw.parse().map_err(|_| {
            AppError::ConfigError(format!("Invalid {name} '{raw}': must be a positive integer"))
        }),
    }
}

/// Period between scheduled runs, derived from the schedule string.
///
/// Not a cron evaluation: the one schedule this deployment actually uses is
/// the every-25-hours form (`*/25` in the hour field), so the token match
/// is enough. Anything else is treated as daily.
pub fn schedule_period(schedule: Option<&str>) -> Duration {
    match schedule {
        Some(s) if s.contains("*/25") => Duration::from_secs(25 * 60 * 60),
        _ => Duration::from_secs(24 * 60 * 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_site() -> SiteConfig {
        SiteConfig {
            base_url: "https://clasificados.example.com".into(),
            admin_path: "/micuenta/avisos".into(),
            republish_path: "/republicar".into(),
            cookies: "session=abc".into(),
        }
    }

    #[test]
    fn page_url_appends_page_query() {
        let site = test_site();
        assert_eq!(
            site.page_url(3).unwrap(),
            "https://clasificados.example.com/micuenta/avisos?page=3"
        );
    }

    #[test]
    fn republish_url_appends_id() {
        let site = test_site();
        assert_eq!(
            site.republish_url("12345").unwrap(),
            "https://clasificados.example.com/micuenta/avisos/republicar/12345"
        );
    }

    #[test]
    fn page_url_rejects_unparseable_base() {
        let mut site = test_site();
        site.base_url = "not a url".into();
        assert!(matches!(
            site.page_url(1),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn schedule_period_matches_25h_token() {
        assert_eq!(
            schedule_period(Some("0 0 */25 * * *")),
            Duration::from_secs(25 * 60 * 60)
        );
        assert_eq!(
            schedule_period(Some("0 0 3 * * *")),
            Duration::from_secs(24 * 60 * 60)
        );
        assert_eq!(schedule_period(None), Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn default_rate_limit() {
        let limits = RateLimitConfig::default();
        assert_eq!(limits.max_concurrent_requests, 20);
        assert_eq!(limits.request_delay, Duration::from_millis(300));
    }
}
