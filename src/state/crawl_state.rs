//! Per-keyword crawl progress

use url::Url;

/// Mutable progress state for one keyword's crawl
///
/// Owned exclusively by the keyword crawler; nothing else mutates it, and
/// it is dropped when the keyword's loop exits.
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// Records emitted so far for this keyword
    pub total_collected: u32,

    /// 1-based index of the search page currently being processed
    pub page_index: u32,

    /// URL of the search page currently being processed
    pub current_url: Url,
}

impl CrawlState {
    /// Creates the state for a fresh keyword, positioned on page 1
    pub fn new(start_url: Url) -> Self {
        Self {
            total_collected: 0,
            page_index: 1,
            current_url: start_url,
        }
    }

    /// Records emitted items for the current page
    pub fn record_emitted(&mut self, count: u32) {
        self.total_collected += count;
    }

    /// Advances to the next search page
    pub fn advance(&mut self, next_url: Url) {
        self.page_index += 1;
        self.current_url = next_url;
    }

    /// Returns how many items may still be collected under the budget
    pub fn remaining_budget(&self, max_items: u32) -> u32 {
        max_items.saturating_sub(self.total_collected)
    }
}
