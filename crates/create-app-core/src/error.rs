//! Error taxonomy for the scaffolding workflow
//!
//! Every variant here is fatal to the run and maps to exit code 1. I/O and
//! parse failures that don't belong to the taxonomy travel as plain
//! `anyhow::Error` with context attached.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The project name cannot be published as a new npm package
    #[error("Could not create a project called \"{name}\" because of npm naming restrictions")]
    InvalidName { name: String, problems: Vec<String> },

    /// No project name from the command line or the prompt
    #[error("Please specify the project directory")]
    MissingProjectName,

    /// Target directory exists and already has entries
    #[error(
        "Could not create a project called \"{name}\" because a project with the same name already exists"
    )]
    DirectoryConflict { name: String },

    /// No template directory for the requested framework/language pair
    #[error("Could not find a template named \"{template}\" (looked in {})", .path.display())]
    TemplateNotFound { template: String, path: PathBuf },

    /// The copied template has no package.json at its root
    #[error(
        "Could not find package.json in the template (expected {}). Make sure your template includes a package.json",
        .path.display()
    )]
    MissingManifest { path: PathBuf },

    /// package.json exists but isn't a JSON object we can patch
    #[error("Failed to update {}: {source}", .path.display())]
    MalformedManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Package manager exited non-zero (or could not be spawned)
    #[error("`{command}` has failed")]
    InstallFailure { command: String, code: i32 },

    /// User hit Ctrl+C / Esc inside a prompt
    #[error("Exiting.")]
    PromptCancelled,
}

impl ScaffoldError {
    /// Exit code for this failure
    pub fn exit_code(&self) -> i32 {
        1
    }
}
