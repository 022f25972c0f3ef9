//! Input normalization
//!
//! Turns the untyped input mapping into [`SearchParameters`]. This is the
//! one component with no failure mode visible to callers: malformed or
//! missing values always degrade to their documented defaults.

use crate::config::types::{OutputOptions, SearchParameters};
use crate::marketplace::Country;
use std::path::PathBuf;
use toml::Value;

/// Keyword used when the input supplies none
pub const DEFAULT_KEYWORD: &str = "iphone 17 case";

const DEFAULT_MAX_ITEMS: u32 = 50;
const DEFAULT_MAX_PAGES: u32 = 3;
const DEFAULT_MAX_DETAIL_ITEMS: u32 = 5;

/// Normalizes the raw input mapping into search parameters
///
/// Rules:
/// - a single string keyword is promoted to a one-element list; blank or
///   non-string entries are dropped; an empty result falls back to the
///   default keyword
/// - country codes are upper-cased; unknown codes fall back to `US`
/// - numeric fields that fail to parse or are non-positive fall back to
///   their defaults; `max_pages` and `max_detail_items` are clamped
/// - `min_reviews` of zero or less collapses to "no filter", while a
///   `min_rating` of 0.0 is retained as a real threshold
pub fn normalize(raw: &Value) -> SearchParameters {
    let table = raw.as_table();
    let get = |key: &str| table.and_then(|t| t.get(key));

    let mut keywords = match get("keywords") {
        Some(Value::String(s)) => vec![s.trim().to_string()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
    keywords.retain(|k| !k.is_empty());
    if keywords.is_empty() {
        keywords.push(DEFAULT_KEYWORD.to_string());
    }

    let max_items_per_keyword = lenient_i64(get("max_items_per_keyword"))
        .filter(|&n| n > 0)
        .map(|n| n as u32)
        .unwrap_or(DEFAULT_MAX_ITEMS);

    let max_pages = lenient_i64(get("max_pages"))
        .unwrap_or(i64::from(DEFAULT_MAX_PAGES))
        .clamp(1, 20) as u32;

    let country = get("country")
        .and_then(Value::as_str)
        .and_then(Country::from_code)
        .unwrap_or_default();

    // 0.0 is kept: it is a meaningful rating threshold, unlike a
    // non-positive review-count filter.
    let min_rating = lenient_f64(get("min_rating"));

    let min_reviews = lenient_i64(get("min_reviews"))
        .filter(|&n| n > 0)
        .map(|n| n as u32);

    let exclude_sponsored = lenient_bool(get("exclude_sponsored")).unwrap_or(false);
    let fetch_details = lenient_bool(get("fetch_details")).unwrap_or(false);

    let max_detail_items = lenient_i64(get("max_detail_items"))
        .unwrap_or(i64::from(DEFAULT_MAX_DETAIL_ITEMS))
        .clamp(1, 50) as u32;

    SearchParameters {
        keywords,
        max_items_per_keyword,
        max_pages,
        country,
        min_rating,
        min_reviews,
        exclude_sponsored,
        fetch_details,
        max_detail_items,
    }
}

/// Normalizes the optional `[output]` table into sink options
pub fn normalize_output(raw: &Value) -> OutputOptions {
    let defaults = OutputOptions::default();
    let table = match raw.get("output").and_then(Value::as_table) {
        Some(t) => t,
        None => return defaults,
    };

    let jsonl_path = table
        .get("jsonl_path")
        .and_then(Value::as_str)
        .map(PathBuf::from)
        .unwrap_or(defaults.jsonl_path);

    let database_path = table
        .get("database_path")
        .and_then(Value::as_str)
        .map(PathBuf::from);

    OutputOptions {
        jsonl_path,
        database_path,
    }
}

/// Reads an integer leniently: accepts integers, floats, and numeric strings
fn lenient_i64(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Integer(n)) => Some(*n),
        Some(Value::Float(f)) => Some(*f as i64),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a float leniently: accepts floats, integers, and numeric strings
fn lenient_f64(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Float(f)) => Some(*f),
        Some(Value::Integer(n)) => Some(*n as f64),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a boolean leniently: accepts booleans and "true"/"false" strings
fn lenient_bool(value: Option<&Value>) -> Option<bool> {
    match value {
        Some(Value::Boolean(b)) => Some(*b),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}
