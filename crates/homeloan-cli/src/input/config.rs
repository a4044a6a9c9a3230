//! YAML configuration for lending policy and transfer fees.
//!
//! Every config struct is `#[serde(default)]`, so a file only needs the
//! keys it overrides.

use serde::de::DeserializeOwned;
use std::fs;

use crate::input::file::resolve_path;

/// Load `T` from a YAML file, or its defaults when no path is given.
pub fn load_yaml<T>(path: Option<&str>) -> Result<T, Box<dyn std::error::Error>>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    tracing::debug!(path = %canonical.display(), "loading configuration");
    parse_yaml(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e).into())
}

fn parse_yaml<T: DeserializeOwned + Default>(contents: &str) -> Result<T, serde_yaml::Error> {
    if contents.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(contents)
}
