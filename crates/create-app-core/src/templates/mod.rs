//! Template lookup, copying and manifest patching
//!
//! This module provides:
//! - The template registry (framework/language → source directory)
//! - Recursive, byte-for-byte template copying
//! - package.json patching (name, pinned dependencies)
//! - Version comparison used by the update notifier

pub mod copier;
pub mod manifest;
pub mod registry;
pub mod version;

use crate::project::DependencyPin;
use anyhow::Result;
use std::path::Path;

pub use copier::copy_tree;
pub use manifest::{PackageManifest, MANIFEST_FILE};
pub use registry::{TemplateDescriptor, TemplateRegistry};
pub use version::newer_version;

/// Materialize a template into `project_dir`.
///
/// The template is resolved before anything is written, so an unknown
/// template leaves no trace on disk. After copying, the project's
/// package.json gets `project_name` and every pin in `pins`. A failure after
/// the copy leaves the partial project in place.
pub async fn materialize(
    registry: &TemplateRegistry,
    descriptor: &TemplateDescriptor,
    project_dir: &Path,
    project_name: &str,
    pins: &[DependencyPin],
) -> Result<PackageManifest> {
    let source = registry.resolve(descriptor)?;

    copy_tree(&source, project_dir).await?;

    let mut manifest = PackageManifest::load(project_dir).await?;
    manifest.set_name(project_name);
    for pin in pins {
        manifest.pin_dependency(pin);
    }
    manifest.save().await?;

    Ok(manifest)
}
