//! Package manager selection

use std::fmt;

/// Environment variable package managers set on the processes they launch
pub const USER_AGENT_ENV: &str = "npm_config_user_agent";

/// Supported JavaScript package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    /// Binary name
    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }

    /// Infer the manager from its user agent signature (e.g. `pnpm/8.0.0 npm/? node/v20`).
    /// Unknown or missing signatures fall back to npm.
    pub fn detect(user_agent: &str) -> Self {
        // yarn before pnpm before bun
        for (prefix, manager) in [
            ("yarn", PackageManager::Yarn),
            ("pnpm", PackageManager::Pnpm),
            ("bun", PackageManager::Bun),
        ] {
            if user_agent.starts_with(prefix) {
                return manager;
            }
        }
        PackageManager::Npm
    }

    /// Detect from the current process environment
    pub fn detect_from_env() -> Self {
        Self::detect(&std::env::var(USER_AGENT_ENV).unwrap_or_default())
    }

    /// Pick the first set `--use-*` flag (npm > pnpm > yarn > bun)
    pub fn from_flags(use_npm: bool, use_pnpm: bool, use_yarn: bool, use_bun: bool) -> Option<Self> {
        [
            (use_npm, PackageManager::Npm),
            (use_pnpm, PackageManager::Pnpm),
            (use_yarn, PackageManager::Yarn),
            (use_bun, PackageManager::Bun),
        ]
        .into_iter()
        .find_map(|(set, manager)| set.then_some(manager))
    }

    /// `<pm> install`
    pub fn install_command(&self) -> String {
        format!("{} install", self.command())
    }

    /// Command that runs a package.json script. Yarn runs scripts directly.
    pub fn run_script(&self, script: &str) -> String {
        match self {
            PackageManager::Yarn => format!("{} {}", self.command(), script),
            _ => format!("{} run {}", self.command(), script),
        }
    }

    /// Prefix for installing a package globally
    pub fn global_install(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm i -g",
            PackageManager::Yarn => "yarn global add",
            PackageManager::Pnpm => "pnpm add -g",
            PackageManager::Bun => "bun add -g",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command())
    }
}
