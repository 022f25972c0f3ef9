use crate::config::normalize::{normalize, normalize_output};
use crate::config::types::{OutputOptions, SearchParameters};
use crate::ConfigError;
use std::path::Path;

/// Reads the input file and parses it into an untyped TOML mapping
///
/// Only I/O and TOML syntax failures are errors; the values inside the
/// mapping are handled leniently by the normalizer.
///
/// # Arguments
///
/// * `path` - Path to the TOML input file
pub fn load_raw_input(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let raw: toml::Value = toml::from_str(&content)?;
    Ok(raw)
}

/// Loads and normalizes the input file in one step
///
/// # Returns
///
/// * `Ok((SearchParameters, OutputOptions))` - Normalized parameters
/// * `Err(ConfigError)` - The file could not be read or is not valid TOML
pub fn load_input(path: &Path) -> Result<(SearchParameters, OutputOptions), ConfigError> {
    let raw = load_raw_input(path)?;
    Ok((normalize(&raw), normalize_output(&raw)))
}
