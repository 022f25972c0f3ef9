//! Keyword crawl orchestration
//!
//! This module contains the per-keyword crawl loop that coordinates all
//! aspects of the pipeline:
//! - Navigation with retry and randomized backoff
//! - Bot-interdiction detection before any card is touched
//! - Batch extraction under the item budget
//! - Bounded detail enrichment
//! - Emission to the result sink
//! - Pagination and every stopping condition

use crate::config::SearchParameters;
use crate::crawler::batch::extract_cards;
use crate::crawler::detail::enrich_records;
use crate::crawler::extract::CardFilters;
use crate::crawler::selectors;
use crate::driver::{Browser, DriverError, Page};
use crate::marketplace::search_url_on;
use crate::output::ResultSink;
use crate::record::EmittedRecord;
use crate::state::{CrawlState, StopReason};
use crate::AmzscanError;
use rand::Rng;
use std::time::Duration;
use url::Url;

/// Timeout for one navigation attempt
pub const NAV_TIMEOUT: Duration = Duration::from_secs(20);

/// Settle interval after navigation, giving dynamic content time to render
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Navigation attempts per page before giving up on the keyword
pub const MAX_NAV_RETRIES: u32 = 3;

// Randomized backoff base range; scaled by the attempt number.
const BACKOFF_MIN_MS: u64 = 1_000;
const BACKOFF_MAX_MS: u64 = 3_000;

/// What to do after one page has been processed
enum PageOutcome {
    /// Advance to the next search page
    Continue(Url),

    /// End this keyword's crawl
    Stop(StopReason),
}

/// Drives the crawl for single keywords
///
/// Holds the shared driver session, the normalized parameters, and the
/// sink. All per-keyword state lives in a [`CrawlState`] owned by the
/// running call and dropped when the keyword finishes.
pub struct KeywordCrawler<'a> {
    session: &'a dyn Browser,
    params: &'a SearchParameters,
    sink: &'a mut dyn ResultSink,
    base_url: Url,
    filters: CardFilters,
}

impl<'a> KeywordCrawler<'a> {
    /// Creates a crawler for the marketplace named by the parameters
    pub fn new(
        session: &'a dyn Browser,
        params: &'a SearchParameters,
        sink: &'a mut dyn ResultSink,
    ) -> Self {
        let base_url = params.country.base_url();
        let filters = CardFilters::from(params);
        Self {
            session,
            params,
            sink,
            base_url,
            filters,
        }
    }

    /// Overrides the marketplace origin, e.g. to point at a mirror or a
    /// test server
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Crawls one keyword to completion and reports why it stopped
    ///
    /// Failures never escape this method; they are folded into the
    /// returned [`StopReason`] so that later keywords always run.
    pub async fn crawl_keyword(&mut self, keyword: &str) -> StopReason {
        let start_url = search_url_on(&self.base_url, keyword);
        tracing::info!("Start scraping keyword \"{}\" from {}", keyword, start_url);

        let mut state = CrawlState::new(start_url);
        let mut enriched = 0usize;

        loop {
            if state.total_collected >= self.params.max_items_per_keyword {
                return StopReason::ItemBudgetReached;
            }
            if state.page_index > self.params.max_pages {
                return StopReason::PageLimitReached;
            }

            let mut page = match self.session.open_page().await {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!(
                        "Failed to open page scope for \"{}\" page={}: {}",
                        keyword,
                        state.page_index,
                        e
                    );
                    return StopReason::PageFailure;
                }
            };

            let outcome = self
                .process_page(page.as_mut(), keyword, &mut state, &mut enriched)
                .await;
            page.close().await;

            match outcome {
                Ok(PageOutcome::Continue(next_url)) => state.advance(next_url),
                Ok(PageOutcome::Stop(reason)) => return reason,
                Err(e) => {
                    tracing::error!(
                        "Failed scraping keyword \"{}\" page={}: {}",
                        keyword,
                        state.page_index,
                        e
                    );
                    return StopReason::PageFailure;
                }
            }
        }
    }

    /// Processes the search page the state currently points at
    ///
    /// Covers navigation, interdiction detection, extraction, enrichment,
    /// emission, and locating the next page. The page scope is owned by
    /// the caller, which releases it on every exit path of this method.
    async fn process_page(
        &mut self,
        page: &mut dyn Page,
        keyword: &str,
        state: &mut CrawlState,
        enriched: &mut usize,
    ) -> Result<PageOutcome, AmzscanError> {
        match self
            .navigate_with_retries(page, &state.current_url, keyword, state.page_index)
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_timeout() => {
                tracing::warn!(
                    "Giving up navigation for \"{}\" page={}: {}",
                    keyword,
                    state.page_index,
                    e
                );
                return Ok(PageOutcome::Stop(StopReason::NavigationFailed));
            }
            Err(e) => return Err(e.into()),
        }

        // Interdiction check runs once per page, before any card is read.
        let content = page.content().await?.to_lowercase();
        if selectors::INTERDICTION_MARKERS
            .iter()
            .any(|marker| content.contains(marker))
        {
            tracing::warn!(
                "This page looks like a bot-protection / CAPTCHA page. \
                 No products will be parsed for \"{}\"",
                keyword
            );
            return Ok(PageOutcome::Stop(StopReason::BotProtection));
        }

        let cards = page.query_all(selectors::RESULT_CARD).await?;
        tracing::info!(
            "Found {} product cards on page {}",
            cards.len(),
            state.page_index
        );
        if cards.is_empty() {
            return Ok(PageOutcome::Stop(StopReason::NoCards));
        }

        let budget = state.remaining_budget(self.params.max_items_per_keyword) as usize;
        let mut records = extract_cards(cards, budget, &self.base_url, &self.filters).await;
        tracing::info!(
            "Parsed {} products from cards on page {}",
            records.len(),
            state.page_index
        );
        if records.is_empty() {
            tracing::info!("No valid products parsed from cards, stopping for this keyword");
            return Ok(PageOutcome::Stop(StopReason::NoSurvivingRecords));
        }

        if self.params.fetch_details {
            *enriched = enrich_records(
                self.session,
                &mut records,
                *enriched,
                self.params.max_detail_items as usize,
            )
            .await;
        }

        let emitted = records.len() as u32;
        for record in records {
            let emitted_record =
                EmittedRecord::new(keyword, self.params.country, state.page_index, record);
            self.sink.accept(&emitted_record)?;
        }
        state.record_emitted(emitted);
        tracing::info!(
            "Pushed {} items for page {}, collected {}/{} items for \"{}\" so far",
            emitted,
            state.page_index,
            state.total_collected,
            self.params.max_items_per_keyword,
            keyword
        );

        if state.total_collected >= self.params.max_items_per_keyword {
            return Ok(PageOutcome::Stop(StopReason::ItemBudgetReached));
        }

        let next_controls = page.query_all(selectors::NEXT_PAGE).await?;
        let next_el = match next_controls.first() {
            Some(el) => el,
            None => {
                tracing::info!("No more pages, stopping pagination");
                return Ok(PageOutcome::Stop(StopReason::NoNextPage));
            }
        };

        let href = match next_el.attr("href").await? {
            Some(href) if !href.is_empty() => href,
            _ => return Ok(PageOutcome::Stop(StopReason::NoNextPage)),
        };

        match resolve_next_url(&href, &self.base_url) {
            Some(next_url) => Ok(PageOutcome::Continue(next_url)),
            None => Ok(PageOutcome::Stop(StopReason::NoNextPage)),
        }
    }

    /// Navigates with up to [`MAX_NAV_RETRIES`] attempts
    ///
    /// Only timeouts are retried; between attempts the crawler sleeps a
    /// random base interval scaled by the attempt number. The last
    /// attempt's timeout propagates. Other driver errors propagate
    /// immediately.
    async fn navigate_with_retries(
        &self,
        page: &mut dyn Page,
        url: &Url,
        keyword: &str,
        page_index: u32,
    ) -> Result<(), DriverError> {
        let mut attempt = 1;
        loop {
            match page.navigate(url, NAV_TIMEOUT).await {
                Ok(()) => {
                    // Give the page a bit of time to render dynamic content.
                    tokio::time::sleep(SETTLE_DELAY).await;
                    return Ok(());
                }
                Err(e) if e.is_timeout() => {
                    tracing::warn!(
                        "Navigation timeout for \"{}\" page={}, attempt {}/{}",
                        keyword,
                        page_index,
                        attempt,
                        MAX_NAV_RETRIES
                    );
                    if attempt == MAX_NAV_RETRIES {
                        return Err(e);
                    }
                    let base_ms = rand::thread_rng().gen_range(BACKOFF_MIN_MS..=BACKOFF_MAX_MS);
                    tokio::time::sleep(Duration::from_millis(base_ms * u64::from(attempt))).await;
                }
                Err(e) => return Err(e),
            }
            attempt += 1;
        }
    }
}

/// Resolves a next-page href against the marketplace origin
fn resolve_next_url(href: &str, base_url: &Url) -> Option<Url> {
    if href.starts_with("http://") || href.starts_with("https://") {
        Url::parse(href).ok()
    } else {
        base_url.join(href).ok()
    }
}

/// Crawls every configured keyword, strictly one after another
///
/// No failure within one keyword's crawl aborts the others; each keyword
/// reports a stop reason which is logged here. The sink is finalized once
/// all keywords are done.
pub async fn crawl(
    params: &SearchParameters,
    session: &dyn Browser,
    sink: &mut dyn ResultSink,
) -> crate::Result<()> {
    for keyword in &params.keywords {
        let mut crawler = KeywordCrawler::new(session, params, &mut *sink);
        let reason = crawler.crawl_keyword(keyword).await;
        if reason.is_failure() {
            tracing::warn!("Keyword \"{}\" ended with {}", keyword, reason);
        } else {
            tracing::info!("Keyword \"{}\" finished: {}", keyword, reason);
        }
    }

    sink.finalize()?;
    Ok(())
}
