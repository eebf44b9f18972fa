//! Discovers the full set of published-ad identifiers across an
//! unknown number of listing pages.
//!
//! The optimistic path probes a handful of pages in parallel, then keeps
//! walking forward one page at a time while pages still have results. If
//! the parallel phase cannot even start, a fully sequential walk takes
//! over. A page that fails to fetch is treated as "no more pages", never
//! as a fatal error.

use std::time::Duration;

use futures::future::join_all;

use crate::config::{RateLimitConfig, SiteConfig};
use crate::error::AppError;
use crate::extract::PageExtractor;
use crate::models::{CollectedAds, PageResult};
use crate::traits::Fetcher;

/// Upper bound on pages probed in parallel.
const MAX_PROBE_PAGES: usize = 5;
/// Pause between sequential continuation fetches.
const CONTINUATION_DELAY: Duration = Duration::from_millis(100);
/// Pause between fetches on the fully sequential fallback path.
const SEQUENTIAL_DELAY: Duration = Duration::from_millis(200);

pub struct PageSetCollector<F: Fetcher> {
    fetcher: F,
    extractor: PageExtractor,
    site: SiteConfig,
    rate_limit: RateLimitConfig,
}

impl<F: Fetcher> PageSetCollector<F> {
    pub fn new(fetcher: F, site: SiteConfig, rate_limit: RateLimitConfig) -> Self {
        Self {
            fetcher,
            extractor: PageExtractor::new(),
            site,
            rate_limit,
        }
    }

    /// Collect the deduplicated set of published-ad identifiers.
    pub async fn collect(&self) -> Result<CollectedAds, AppError> {
        tracing::info!("Starting to scrape all ad ids");

        let collected = match self.collect_parallel().await {
            Ok(collected) => collected,
            Err(e) => {
                tracing::error!(error = %e, "Parallel scraping failed, falling back to sequential");
                self.collect_sequential().await?
            }
        };

        tracing::info!(
            unique = collected.ad_ids.len(),
            total_scanned = collected.total_scanned,
            unpublished_skipped = collected.unpublished_skipped,
            "Scraping completed"
        );

        Ok(collected)
    }

    /// Probe the first pages concurrently, then continue sequentially
    /// while pages keep yielding results.
    async fn collect_parallel(&self) -> Result<CollectedAds, AppError> {
        let pages_to_try = self.probe_width();

        // URL construction happens before any per-page isolation; a bad
        // base URL fails the whole phase and triggers the fallback.
        let mut urls = Vec::with_capacity(pages_to_try);
        for page in 1..=pages_to_try as u32 {
            urls.push(self.site.page_url(page)?);
        }

        let probes = join_all(
            urls.iter()
                .enumerate()
                .map(|(i, url)| self.scrape_url(url, i as u32 + 1)),
        )
        .await;

        let mut collected = CollectedAds::default();
        let mut last_valid_page = 0usize;
        for (i, probe) in probes.into_iter().enumerate() {
            match probe {
                Ok(result) if !result.ad_ids.is_empty() => {
                    collected.absorb(&result);
                    // Contiguous from page 1: a gap freezes the watermark.
                    if last_valid_page == i {
                        last_valid_page = i + 1;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(page = i + 1, error = %e, "Probe page failed");
                }
            }
        }

        // Every probed page had results: there may be more.
        if last_valid_page == pages_to_try {
            let mut page = pages_to_try as u32 + 1;
            loop {
                tracing::debug!(page, "Scraping additional page");
                match self.scrape_page(page).await {
                    Ok(result) if !result.ad_ids.is_empty() => {
                        collected.absorb(&result);
                        page += 1;
                        tokio::time::sleep(CONTINUATION_DELAY).await;
                    }
                    Ok(_) => break,
                    Err(e) => {
                        tracing::error!(page, error = %e, "Error scraping page");
                        break;
                    }
                }
            }
        }

        Ok(collected)
    }

    /// Conservative path: one page at a time from the start, trusting the
    /// advisory next-page signal as an additional stop condition.
    async fn collect_sequential(&self) -> Result<CollectedAds, AppError> {
        tracing::info!("Using sequential scraping fallback");

        let mut collected = CollectedAds::default();
        let mut page = 1u32;
        loop {
            match self.scrape_page(page).await {
                Ok(result) => {
                    collected.absorb(&result);
                    if result.ad_ids.is_empty() || !result.likely_has_next_page {
                        break;
                    }
                    page += 1;
                    tokio::time::sleep(SEQUENTIAL_DELAY).await;
                }
                Err(e) => {
                    tracing::error!(page, error = %e, "Error scraping page");
                    break;
                }
            }
        }

        Ok(collected)
    }

    async fn scrape_page(&self, page: u32) -> Result<PageResult, AppError> {
        let url = self.site.page_url(page)?;
        self.scrape_url(&url, page).await
    }

    async fn scrape_url(&self, url: &str, page: u32) -> Result<PageResult, AppError> {
        let html = self.fetcher.fetch(url).await.inspect_err(|e| {
            tracing::error!(page, error = %e, "Failed to fetch page");
        })?;
        Ok(self.extractor.extract(&html, page))
    }

    fn probe_width(&self) -> usize {
        MAX_PROBE_PAGES.min((self.rate_limit.max_concurrent_requests / 4).max(1))
    }
}
