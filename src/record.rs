//! Product record data model
//!
//! `ProductRecord` is the fully-extracted representation of one search
//! result card. `EmittedRecord` wraps it with the crawl context (keyword,
//! country, page index) at emission time. Wire field names are camelCase.

use crate::marketplace::Country;
use serde::{Deserialize, Serialize};

/// A single extracted product
///
/// A record is only ever constructed fully populated: a card without a
/// resolvable ASIN or title link is discarded before this type exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Amazon Standard Identification Number, the stable per-item key
    pub asin: String,

    /// Product title, trimmed
    pub title: String,

    /// Absolute product URL with the query string stripped
    pub product_url: String,

    /// Raw price display text (e.g. "$92.14"), empty when no price shown
    pub price_text: String,

    /// Parsed numeric price, absent when the display text did not parse
    pub price: Option<f64>,

    /// Raw struck-through price text, never numerically parsed
    pub original_price_text: String,

    /// Star rating parsed from the rating announcement
    pub rating: Option<f64>,

    /// Review count with thousands separators stripped
    pub reviews_count: Option<u32>,

    /// True iff a Prime badge marker exists on the card
    pub is_prime: bool,

    /// Brand name, possibly empty; promotional labels mis-selected as brand
    /// text are cleared during extraction
    pub brand: String,

    /// Badge labels in first-seen order, no duplicates
    pub badges: Vec<String>,

    /// True iff the card carries a sponsored label
    pub is_sponsored: bool,

    /// First product image source, or empty
    pub image_url: String,

    /// Best-effort currency symbol or code, or empty
    pub currency: String,

    /// Breadcrumb labels from the detail page, present only after enrichment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_path: Option<Vec<String>>,

    /// Feature bullets from the detail page, present only after enrichment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_bullets: Option<Vec<String>>,
}

impl ProductRecord {
    /// Returns true if enrichment attached any detail-page data
    pub fn is_enriched(&self) -> bool {
        self.category_path.is_some() || self.feature_bullets.is_some()
    }
}

/// A record as handed to the result sink, carrying its crawl context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmittedRecord {
    /// The search keyword this item was found under
    pub keyword: String,

    /// The marketplace the item was scraped from
    pub country: Country,

    /// The 1-based search page the item appeared on
    pub page_index: u32,

    #[serde(flatten)]
    pub record: ProductRecord,
}

impl EmittedRecord {
    pub fn new(keyword: &str, country: Country, page_index: u32, record: ProductRecord) -> Self {
        Self {
            keyword: keyword.to_string(),
            country,
            page_index,
            record,
        }
    }
}
