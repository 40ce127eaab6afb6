//! Fixture path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the fixtures directory.
pub const FIXTURES_ENV_VAR: &str = "MKT_FIXTURES_DIR";

/// Get the fixtures root directory.
///
/// Resolution order:
/// 1. `MKT_FIXTURES_DIR` environment variable
/// 2. `fixtures/` directory relative to workspace root
///
/// # Example
///
/// ```rust,ignore
/// let root = mkt_directory::paths::fixtures_root();
/// let description = root.join("platform-openapi.json");
/// ```
pub fn fixtures_root() -> PathBuf {
    if let Ok(root) = std::env::var(FIXTURES_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures")
}

/// Trimmed copy of the platform's OpenAPI description.
pub fn api_description_path() -> PathBuf {
    fixtures_root().join("platform-openapi.json")
}

/// Small, internally consistent marketplace document.
pub fn sample_document_path() -> PathBuf {
    fixtures_root().join("sample-marketplace.yaml")
}
