//! Package manager detection and dependency installation
//!
//! This module provides:
//! - Package manager inference from the invoking tool's user agent
//! - The `<pm> install` subprocess runner

pub mod installer;
pub mod package_manager;

pub use installer::{install, InstallResult};
pub use package_manager::PackageManager;
