//! Version comparison for update checks

use anyhow::Result;
use semver::Version;

/// Returns the published version if it is newer than the running one.
/// Unparseable versions never produce a notice.
pub fn newer_version(current: &str, published: &str) -> Option<Version> {
    let current = parse_version(current).ok()?;
    let published = parse_version(published).ok()?;

    (published > current).then_some(published)
}

/// Parse version string, handling various formats
pub fn parse_version(version_str: &str) -> Result<Version> {
    // Remove leading 'v' if present
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}
