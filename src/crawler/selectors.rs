//! CSS selectors and marker tables for Amazon page layouts
//!
//! Everything layout-dependent lives here. When Amazon changes their HTML
//! structure, update this file and the affected test fixtures.

/// Product card container on a search-results page
pub const RESULT_CARD: &str = "div.s-main-slot div[data-component-type='s-search-result']";

/// Card attribute carrying the ASIN
pub const ASIN_ATTR: &str = "data-asin";

/// Title link, current layout
pub const TITLE_LINK: &str = "a.a-link-normal.s-link-style.a-text-normal";

/// Title link fallback for older layouts
pub const TITLE_LINK_FALLBACK: &str = "h2 a.a-link-normal";

/// Current price display text
pub const PRICE: &str = "span.a-price > span.a-offscreen";

/// Struck-through original price
pub const ORIGINAL_PRICE: &str = "span.a-price.a-text-price span.a-offscreen";

/// Rating announcement text (e.g. "4.5 out of 5 stars")
pub const RATING: &str = "span.a-icon-alt";

/// Review count text
pub const REVIEWS_COUNT: &str = "span.a-size-base.s-underline-text";

/// Prime badge markers
pub const PRIME_BADGE: &str = "i.a-icon.a-icon-prime, span[data-component-type='s-prime']";

/// Card attribute carrying an explicit brand, when present
pub const BRAND_ATTR: &str = "data-brand";

/// Secondary brand text fallback
pub const BRAND_FALLBACK: &str = "h5.s-line-clamp-1 span, span.a-size-base-plus.a-color-base";

/// Badge and label elements
pub const BADGES: &str = "span.a-badge-text, span.s-label-popover-default, \
     span.s-label-popover-default span.a-badge-label-inner";

/// Sponsored-label candidates; the label text decides
pub const SPONSORED_LABEL: &str = "span.s-sponsored-label-text, span.a-color-secondary";

/// Main product image
pub const PRODUCT_IMAGE: &str = "img.s-image";

/// Enabled next-page control
pub const NEXT_PAGE: &str = "a.s-pagination-next:not(.s-pagination-disabled)";

/// Breadcrumb links on a detail page
pub const BREADCRUMB_LINKS: &str =
    "#wayfinding-breadcrumbs_feature_div li a, nav[aria-label='Breadcrumb'] a";

/// Feature bullets on a detail page
pub const FEATURE_BULLETS: &str = "#feature-bullets ul li span";

/// Content fragments that identify a bot-protection / CAPTCHA page.
/// Matched case-insensitively against the rendered page content.
pub const INTERDICTION_MARKERS: &[&str] = &[
    "api-services-support@amazon.com",
    "to discuss automated access to amazon data",
    "/captcha/",
    "enter the characters you see below",
];

/// Promotional phrases that get mis-selected as brand text. A resolved
/// brand containing one of these (case-insensitive) is cleared. This list
/// is a layout-dependent heuristic, not a guaranteed classifier.
pub const BADGE_PHRASES: &[&str] = &[
    "amazon's choice",
    "overall pick",
    "best seller",
    "limited time deal",
];

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    #[test]
    fn test_selectors_compile() {
        for selector in [
            RESULT_CARD,
            TITLE_LINK,
            TITLE_LINK_FALLBACK,
            PRICE,
            ORIGINAL_PRICE,
            RATING,
            REVIEWS_COUNT,
            PRIME_BADGE,
            BRAND_FALLBACK,
            BADGES,
            SPONSORED_LABEL,
            PRODUCT_IMAGE,
            NEXT_PAGE,
            BREADCRUMB_LINKS,
            FEATURE_BULLETS,
        ] {
            assert!(Selector::parse(selector).is_ok(), "bad selector: {selector}");
        }
    }

    #[test]
    fn test_interdiction_markers_are_lowercase() {
        // The block detector lower-cases page content before matching.
        for marker in INTERDICTION_MARKERS {
            assert_eq!(*marker, marker.to_lowercase());
        }
    }

    #[test]
    fn test_badge_phrases_are_lowercase() {
        for phrase in BADGE_PHRASES {
            assert_eq!(*phrase, phrase.to_lowercase());
        }
    }
}
