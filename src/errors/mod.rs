use std::fmt::Display;
use std::path::Path;

use anyhow::Context as _;

/// Context for a catalog request that failed or was refused
pub fn fetch_context(url: &str) -> String {
    format!("Failed to fetch catalog page from: {}", url)
}

/// Context for a catalog request answered with a non-success status
pub fn status_context(url: &str, status: impl Display) -> String {
    format!("{}: server answered {}", fetch_context(url), status)
}

pub fn parse_context(what: &str) -> String {
    format!("Failed to parse {}", what)
}

/// Context for a catalog cache operation on a store key
pub fn cache_context(operation: &str, key: &str) -> String {
    format!("Failed to {} catalog cache under key: {}", operation, key)
}

/// Context for a file the catalog cache or a saved page lives in
pub fn file_context(operation: &str, path: &Path) -> String {
    format!("Failed to {} {}", operation, path.display())
}

pub fn with_fetch_context<T, E>(result: Result<T, E>, url: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.with_context(|| fetch_context(url))
}

pub fn with_parse_context<T, E>(result: Result<T, E>, what: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.with_context(|| parse_context(what))
}
