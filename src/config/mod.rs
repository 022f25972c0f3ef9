//! Configuration module
//!
//! This module loads the TOML input file as an untyped mapping and
//! normalizes it into typed [`SearchParameters`]. Value-level malformation
//! is never an error: every field degrades to its documented default.
//!
//! # Example
//!
//! ```no_run
//! use amzscan::config::load_input;
//! use std::path::Path;
//!
//! let (params, output) = load_input(Path::new("input.toml")).unwrap();
//! println!("Scraping {} keywords", params.keywords.len());
//! # let _ = output;
//! ```

mod normalize;
mod parser;
mod types;

// Re-export types
pub use types::{OutputOptions, SearchParameters};

// Re-export parser and normalizer functions
pub use normalize::{normalize, normalize_output, DEFAULT_KEYWORD};
pub use parser::{load_input, load_raw_input};
