//! Single-card field extraction
//!
//! Turns one result-card handle into a fully-populated [`ProductRecord`]
//! or a discard; partial records never exist. Filters run last, after the
//! whole card has been read. Any unexpected failure is caught at the card
//! boundary and treated as a discard.

use crate::config::SearchParameters;
use crate::crawler::selectors;
use crate::driver::{DriverResult, Element};
use crate::record::ProductRecord;
use url::Url;

/// Filter predicates applied to a fully-extracted card
#[derive(Debug, Clone, Copy, Default)]
pub struct CardFilters {
    pub min_rating: Option<f64>,
    pub min_reviews: Option<u32>,
    pub exclude_sponsored: bool,
}

impl From<&SearchParameters> for CardFilters {
    fn from(params: &SearchParameters) -> Self {
        Self {
            min_rating: params.min_rating,
            min_reviews: params.min_reviews,
            exclude_sponsored: params.exclude_sponsored,
        }
    }
}

/// Extracts one card into a record, or discards it
///
/// Returns None both for structured discards (missing ASIN or title link,
/// filtered out) and for unexpected extraction failures, which are logged
/// at debug level and never propagated past the card boundary.
pub async fn extract_card(
    card: &dyn Element,
    base_url: &Url,
    filters: &CardFilters,
) -> Option<ProductRecord> {
    match try_extract_card(card, base_url, filters).await {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!("Failed to parse product card: {}", e);
            None
        }
    }
}

async fn try_extract_card(
    card: &dyn Element,
    base_url: &Url,
    filters: &CardFilters,
) -> DriverResult<Option<ProductRecord>> {
    let asin = match card.attr(selectors::ASIN_ATTR).await? {
        Some(asin) if !asin.is_empty() => asin,
        _ => return Ok(None),
    };

    // Title link, with a fallback selector for older page layouts.
    let mut title_links = card.query_all(selectors::TITLE_LINK).await?;
    if title_links.is_empty() {
        title_links = card.query_all(selectors::TITLE_LINK_FALLBACK).await?;
    }
    let title_el = match title_links.first() {
        Some(el) => el,
        None => {
            tracing::debug!("Skipping card: no title link found");
            return Ok(None);
        }
    };

    let title = title_el.text().await?;

    let href = match title_el.attr("href").await? {
        Some(href) if !href.is_empty() => href,
        _ => {
            tracing::debug!("Skipping card: title link has no href");
            return Ok(None);
        }
    };
    let product_url = resolve_product_url(&href, base_url);

    let price_text = first_text(card, selectors::PRICE).await?.unwrap_or_default();
    let price = parse_price(&price_text);
    let currency = detect_currency(&price_text);

    let original_price_text = first_text(card, selectors::ORIGINAL_PRICE)
        .await?
        .unwrap_or_default();

    let rating = first_text(card, selectors::RATING)
        .await?
        .as_deref()
        .and_then(parse_rating);

    let reviews_count = first_text(card, selectors::REVIEWS_COUNT)
        .await?
        .as_deref()
        .and_then(parse_review_count);

    let is_prime = card.count(selectors::PRIME_BADGE).await? > 0;

    // Brand: explicit attribute first, then the secondary text element.
    let mut brand = card
        .attr(selectors::BRAND_ATTR)
        .await?
        .map(|b| b.trim().to_string())
        .unwrap_or_default();
    if brand.is_empty() {
        brand = first_text(card, selectors::BRAND_FALLBACK)
            .await?
            .unwrap_or_default();
    }
    if is_badge_phrase(&brand) {
        // A promotional label mis-selected as brand text, not a brand name.
        brand.clear();
    }

    let mut badges: Vec<String> = Vec::new();
    for badge_el in card.query_all(selectors::BADGES).await? {
        let label = badge_el.text().await?;
        if !label.is_empty() && !badges.contains(&label) {
            badges.push(label);
        }
    }

    let is_sponsored = match card.first(selectors::SPONSORED_LABEL).await? {
        Some(el) => el.text().await?.to_lowercase().contains("sponsored"),
        None => false,
    };

    let image_url = match card.first(selectors::PRODUCT_IMAGE).await? {
        Some(el) => el.attr("src").await?.unwrap_or_default(),
        None => String::new(),
    };

    // Filters, applied after full extraction; each only when both sides
    // are present.
    if let (Some(min_rating), Some(rating)) = (filters.min_rating, rating) {
        if rating < min_rating {
            return Ok(None);
        }
    }
    if let (Some(min_reviews), Some(reviews)) = (filters.min_reviews, reviews_count) {
        if reviews < min_reviews {
            return Ok(None);
        }
    }
    if filters.exclude_sponsored && is_sponsored {
        return Ok(None);
    }

    Ok(Some(ProductRecord {
        asin,
        title,
        product_url,
        price_text,
        price,
        original_price_text,
        rating,
        reviews_count,
        is_prime,
        brand,
        badges,
        is_sponsored,
        image_url,
        currency,
        category_path: None,
        feature_bullets: None,
    }))
}

/// Strips the query string and resolves relative targets against the
/// marketplace base origin
fn resolve_product_url(href: &str, base_url: &Url) -> String {
    let stripped = href.split('?').next().unwrap_or(href);
    if stripped.starts_with("http://") || stripped.starts_with("https://") {
        stripped.to_string()
    } else {
        base_url
            .join(stripped)
            .map(Into::into)
            .unwrap_or_else(|_| stripped.to_string())
    }
}

/// Reads the trimmed text of the first match, if any
async fn first_text(card: &dyn Element, selector: &str) -> DriverResult<Option<String>> {
    match card.first(selector).await? {
        Some(el) => Ok(Some(el.text().await?)),
        None => Ok(None),
    }
}

/// Parses a price display string into a number
///
/// Handles both US style (1,234.56) and European style (1.234,56 / 92,14):
/// a comma with no period marks the comma as the decimal separator.
pub fn parse_price(text: &str) -> Option<f64> {
    let numeric: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if numeric.is_empty() {
        return None;
    }

    let normalized = if numeric.contains(',') && !numeric.contains('.') {
        numeric.replace(',', ".")
    } else {
        numeric.replace(',', "")
    };
    normalized.parse().ok()
}

/// Best-effort currency detection from the raw price text
///
/// A leading symbol wins; otherwise a trailing 3-4 byte token is taken as
/// an ISO-style code (which also admits the three-byte "€").
pub fn detect_currency(text: &str) -> String {
    let stripped = text.trim();
    let first = match stripped.chars().next() {
        Some(c) => c,
        None => return String::new(),
    };
    if matches!(first, '$' | '€' | '£' | '¥') {
        return first.to_string();
    }
    match stripped.split_whitespace().last() {
        Some(token) if (3..=4).contains(&token.len()) => token.to_string(),
        _ => String::new(),
    }
}

/// Parses "4.5 out of 5 stars" style rating announcements
pub fn parse_rating(text: &str) -> Option<f64> {
    text.split_whitespace()
        .next()?
        .replace(',', ".")
        .parse()
        .ok()
}

/// Parses a review count, stripping thousands separators
pub fn parse_review_count(text: &str) -> Option<u32> {
    text.replace([',', '.'], "").parse().ok()
}

fn is_badge_phrase(brand: &str) -> bool {
    if brand.is_empty() {
        return false;
    }
    let lowered = brand.to_lowercase();
    selectors::BADGE_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}
