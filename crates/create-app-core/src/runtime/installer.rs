//! Dependency installation through the selected package manager
//!
//! The child inherits stdio so installer output streams straight to the
//! user's terminal. There is no timeout: installs run to completion.

use super::package_manager::PackageManager;
use crate::error::ScaffoldError;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

/// Exit code reported when the package manager binary could not be started
pub const COMMAND_NOT_FOUND: i32 = 127;

/// Environment applied to the install subprocess
pub const INSTALL_ENV: &[(&str, &str)] = &[
    ("ADBLOCK", "1"),
    // keep devDependencies even if the user's shell exports NODE_ENV=production
    ("NODE_ENV", "development"),
    ("DISABLE_OPENCOLLECTIVE", "1"),
];

/// Result of a successful install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    pub exit_code: i32,
    pub command: String,
}

/// Run `<pm> install` inside `working_dir` and wait for it to exit
pub async fn install(
    package_manager: PackageManager,
    working_dir: &Path,
) -> Result<InstallResult, ScaffoldError> {
    let command = package_manager.install_command();
    tracing::debug!(%command, dir = %working_dir.display(), "spawning installer");

    let mut child = match TokioCommand::new(package_manager.command())
        .arg("install")
        .current_dir(working_dir)
        .envs(INSTALL_ENV.iter().copied())
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            tracing::debug!(error = %e, "failed to spawn installer");
            return Err(ScaffoldError::InstallFailure {
                command,
                code: COMMAND_NOT_FOUND,
            });
        }
    };

    let status = child.wait().await.map_err(|e| {
        tracing::debug!(error = %e, "failed to wait for installer");
        ScaffoldError::InstallFailure {
            command: command.clone(),
            code: -1,
        }
    })?;

    // killed by a signal: no code
    let exit_code = status.code().unwrap_or(-1);
    tracing::debug!(exit_code, "installer exited");

    if status.success() {
        Ok(InstallResult { exit_code, command })
    } else {
        Err(ScaffoldError::InstallFailure {
            command,
            code: exit_code,
        })
    }
}
