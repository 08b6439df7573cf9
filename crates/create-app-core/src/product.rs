//! Product configuration trait for CLI binaries
//!
//! Each scaffolding binary implements this trait to declare what it offers:
//! its identity, the framework templates it ships, and any dependency
//! versions it forces into generated projects.

use crate::project::{DependencyPin, Framework, Language};
use std::path::PathBuf;

/// Configuration trait for different CLI products
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Package name on the npm registry, used for update checks
    fn package_name(&self) -> &'static str {
        self.name()
    }

    /// Frameworks offered, in prompt order
    fn frameworks(&self) -> &'static [Framework];

    /// Languages offered for every framework
    fn languages(&self) -> &'static [Language] {
        &[Language::TypeScript, Language::JavaScript]
    }

    /// Dependencies written into every generated package.json
    fn pinned_dependencies(&self) -> Vec<DependencyPin> {
        Vec::new()
    }

    /// Environment variable overriding the template root
    fn templates_env(&self) -> &'static str;

    /// Template root shipped with the product
    fn bundled_templates_dir(&self) -> PathBuf;

    /// Default name suggested by the project name prompt
    fn default_project_name(&self) -> &'static str {
        "my-app"
    }

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
