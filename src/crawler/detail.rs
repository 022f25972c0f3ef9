//! Detail-page enrichment
//!
//! Visits product pages for a bounded subset of freshly-extracted records
//! and attaches the category breadcrumb and feature bullets. Enrichment is
//! strictly best-effort: a failure skips that record's enrichment and
//! nothing else. The detail page scope is released on every exit path.

use crate::crawler::selectors;
use crate::driver::{Browser, DriverResult, Page};
use crate::record::ProductRecord;
use std::time::Duration;
use url::Url;

/// Navigation timeout for one detail page
pub const DETAIL_NAV_TIMEOUT: Duration = Duration::from_secs(20);

/// Enriches records up to the per-keyword ceiling
///
/// # Arguments
///
/// * `session` - The shared driver session
/// * `records` - Records just extracted from one page
/// * `already_enriched` - How many records were enriched for this keyword
///   on earlier pages
/// * `ceiling` - The configured per-keyword enrichment ceiling
///
/// # Returns
///
/// The updated per-keyword enriched count. Only successful detail visits
/// advance it; failures do not burn enrichment budget.
pub async fn enrich_records(
    session: &dyn Browser,
    records: &mut [ProductRecord],
    already_enriched: usize,
    ceiling: usize,
) -> usize {
    let mut enriched = already_enriched;

    for record in records.iter_mut() {
        if enriched >= ceiling {
            break;
        }

        let detail_url = match Url::parse(&record.product_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping enrichment, bad product URL: {}", e);
                continue;
            }
        };

        let mut page = match session.open_page().await {
            Ok(page) => page,
            Err(e) => {
                tracing::debug!("Failed to open detail page scope: {}", e);
                continue;
            }
        };

        let outcome = enrich_one(page.as_mut(), &detail_url, record).await;
        page.close().await;

        match outcome {
            Ok(()) => enriched += 1,
            Err(e) => {
                tracing::debug!("Failed to enrich product with detail page: {}", e);
            }
        }
    }

    enriched
}

/// Extracts breadcrumbs and feature bullets from one detail page
///
/// Whichever sequence turns out non-empty is attached to the record; an
/// empty page still counts as a successful visit.
async fn enrich_one(
    page: &mut dyn Page,
    detail_url: &Url,
    record: &mut ProductRecord,
) -> DriverResult<()> {
    page.navigate(detail_url, DETAIL_NAV_TIMEOUT).await?;

    let mut category_path = Vec::new();
    for el in page.query_all(selectors::BREADCRUMB_LINKS).await? {
        let label = el.text().await?;
        if !label.is_empty() {
            category_path.push(label);
        }
    }
    if !category_path.is_empty() {
        record.category_path = Some(category_path);
    }

    let mut feature_bullets = Vec::new();
    for el in page.query_all(selectors::FEATURE_BULLETS).await? {
        let bullet = el.text().await?;
        if !bullet.is_empty() {
            feature_bullets.push(bullet);
        }
    }
    if !feature_bullets.is_empty() {
        record.feature_bullets = Some(feature_bullets);
    }

    Ok(())
}
