//! Create App Core - Shared library for React / Next.js scaffolding CLIs
//!
//! This library copies a bundled template into a new project directory,
//! patches its package.json and bootstraps it with the user's package
//! manager. Binaries supply a [`ProductConfig`] describing which templates
//! they offer and which dependency versions they pin.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Name validation, package manager detection,
//!   filesystem guards, template materialization, dependency install, update checks
//! - **Layer 2: Product Configuration** - `ProductConfig` trait and `ProjectRequest`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts and interrupt handling
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use create_app_core::templates::{materialize, TemplateDescriptor, TemplateRegistry};
//! use create_app_core::project::{Framework, Language};
//!
//! let registry = TemplateRegistry::from_config(&MyConfig, None);
//! let descriptor = TemplateDescriptor::new(Framework::React, Language::TypeScript);
//! materialize(&registry, &descriptor, &project_dir, "my-app", &[]).await?;
//! ```

pub mod error;
pub mod naming;
pub mod probe;
pub mod product;
pub mod project;
pub mod runtime;
pub mod templates;
pub mod update;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::ScaffoldError;
pub use naming::{validate, NameValidation};
pub use product::ProductConfig;
pub use project::{DependencyPin, Framework, FrameworkKind, Language, ProjectDraft, ProjectRequest};
pub use runtime::{install, InstallResult, PackageManager};
pub use templates::{materialize, PackageManifest, TemplateDescriptor, TemplateRegistry};
pub use update::UpdateCheck;

#[cfg(feature = "tui")]
pub use tui::run;
