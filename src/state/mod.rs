//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: per-keyword mutable progress counters, owned exclusively
//!   by the keyword crawler and destroyed when its loop exits
//! - `StopReason`: the explicit enumeration of every condition that ends a
//!   keyword's crawl

mod crawl_state;
mod stop_reason;

// Re-export main types
pub use crawl_state::CrawlState;
pub use stop_reason::StopReason;
