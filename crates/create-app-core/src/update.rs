//! Best-effort check for a newer published release of the CLI
//!
//! The check starts as a detached task when the CLI launches and is joined
//! once, right before exit, with a bounded wait. Every failure (network,
//! HTTP status, JSON, version parse, join timeout) silently yields "no update".

use crate::runtime::PackageManager;
use crate::templates::version::newer_version;
use anyhow::{Context, Result};
use colored::Colorize;
use semver::Version;
use serde::Deserialize;
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

/// Public npm registry
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org/";

/// Setting this variable (to anything) disables the check
pub const DISABLE_ENV: &str = "NO_UPDATE_NOTIFIER";

/// Timeout for the registry request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// How long exit waits for an unfinished check
pub const JOIN_TIMEOUT: Duration = Duration::from_millis(1500);

#[derive(Debug, Deserialize)]
struct LatestRelease {
    version: String,
}

/// A running (or disabled) update check
pub struct UpdateCheck {
    package_name: String,
    handle: Option<JoinHandle<Option<Version>>>,
}

impl UpdateCheck {
    /// Start checking `package_name` against the public registry.
    /// Must be called inside a tokio runtime.
    pub fn spawn(package_name: &str, current_version: &str, user_agent: &str) -> Self {
        if std::env::var_os(DISABLE_ENV).is_some() {
            return Self::disabled(package_name);
        }
        match Url::parse(DEFAULT_REGISTRY) {
            Ok(registry) => {
                Self::spawn_with_registry(registry, package_name, current_version, user_agent)
            }
            Err(_) => Self::disabled(package_name),
        }
    }

    /// Start a check against a specific registry
    pub fn spawn_with_registry(
        registry: Url,
        package_name: &str,
        current_version: &str,
        user_agent: &str,
    ) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let package = package_name.to_string();
        let current = current_version.to_string();
        let handle = tokio::spawn(async move {
            match fetch_latest(&client, &registry, &package).await {
                Ok(latest) => newer_version(&current, &latest),
                Err(e) => {
                    tracing::debug!(error = %e, "update check failed");
                    None
                }
            }
        });

        Self {
            package_name: package_name.to_string(),
            handle: Some(handle),
        }
    }

    /// A check that never reports an update
    pub fn disabled(package_name: &str) -> Self {
        Self {
            package_name: package_name.to_string(),
            handle: None,
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Wait up to `wait` for the result. Unfinished checks are abandoned.
    pub async fn finish(self, wait: Duration) -> Option<Version> {
        let handle = self.handle?;
        match tokio::time::timeout(wait, handle).await {
            Ok(Ok(latest)) => latest,
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "update check task failed");
                None
            }
            Err(_) => {
                tracing::debug!("update check timed out");
                None
            }
        }
    }

    /// Join the check and print a notice if a newer release exists
    pub async fn notify(self, package_manager: PackageManager) {
        let package_name = self.package_name.clone();
        if let Some(latest) = self.finish(JOIN_TIMEOUT).await {
            tracing::debug!(%latest, "newer release available");
            println!("{}", update_notice(&package_name, package_manager));
        }
    }
}

/// Two-line update notice
pub fn update_notice(package_name: &str, package_manager: PackageManager) -> String {
    let command = format!("{} {}", package_manager.global_install(), package_name);
    format!(
        "{}\nYou can update by running: {}\n",
        format!("A new version of `{}` is available!", package_name)
            .yellow()
            .bold(),
        command.cyan()
    )
}

/// `<registry>/<package>/latest`, with scoped names encoded as one segment
pub fn latest_url(registry: &Url, package_name: &str) -> Result<Url> {
    let mut url = registry.clone();
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", registry))?
        .pop_if_empty()
        .push(package_name)
        .push("latest");
    Ok(url)
}

/// Fetch the `latest` dist-tag version of `package_name`
pub async fn fetch_latest(
    client: &reqwest::Client,
    registry: &Url,
    package_name: &str,
) -> Result<String> {
    let url = latest_url(registry, package_name)?;
    let response = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Failed to fetch {}: HTTP {}", url, response.status());
    }

    let release: LatestRelease = response
        .json()
        .await
        .context("Failed to parse registry response")?;
    Ok(release.version)
}
