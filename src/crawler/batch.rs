//! Per-page card batch extraction
//!
//! Runs the field extractor over the cards of one page under two bounds:
//! the remaining item budget (cards beyond it are never parsed) and a
//! per-card soft deadline. Card order is preserved in the output.

use crate::crawler::extract::{extract_card, CardFilters};
use crate::driver::Element;
use crate::record::ProductRecord;
use std::time::Duration;
use url::Url;

/// Soft deadline for parsing a single card
pub const CARD_DEADLINE: Duration = Duration::from_secs(5);

/// Extracts the cards of one page into records
///
/// # Arguments
///
/// * `cards` - Card handles in page order
/// * `budget` - How many items may still be collected for this keyword
/// * `base_url` - Marketplace origin for resolving relative links
/// * `filters` - Active filter predicates
///
/// # Returns
///
/// Surviving records in card order. A card that breaches the deadline is
/// logged and skipped, not retried; a card that fails to parse is simply
/// absent from the output.
pub async fn extract_cards(
    cards: Vec<Box<dyn Element>>,
    budget: usize,
    base_url: &Url,
    filters: &CardFilters,
) -> Vec<ProductRecord> {
    let mut records = Vec::new();

    // Never parse cards the budget cannot use.
    for card in cards.into_iter().take(budget) {
        match tokio::time::timeout(CARD_DEADLINE, extract_card(card.as_ref(), base_url, filters))
            .await
        {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(_) => {
                tracing::warn!("Timed out while parsing a single product card, skipping it");
            }
        }
    }

    records
}
