//! The crawl-and-extract pipeline
//!
//! This module contains the core crawling logic:
//! - Per-card field extraction and normalization
//! - Batch extraction under budget and per-card deadline
//! - Bounded detail-page enrichment
//! - Per-keyword orchestration with retry, interdiction detection,
//!   pagination, and stopping conditions

mod batch;
mod coordinator;
mod detail;
mod extract;
pub mod selectors;

pub use batch::{extract_cards, CARD_DEADLINE};
pub use coordinator::{crawl, KeywordCrawler, MAX_NAV_RETRIES, NAV_TIMEOUT, SETTLE_DELAY};
pub use detail::{enrich_records, DETAIL_NAV_TIMEOUT};
pub use extract::{
    detect_currency, extract_card, parse_price, parse_rating, parse_review_count, CardFilters,
};
