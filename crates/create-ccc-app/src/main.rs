//! create-ccc-app - Project scaffolding for CCC-connected React and Next.js apps

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use colored::Colorize;
use create_app_core::tui::{Cancellation, CreateArgs, TerminalGuard};
use create_app_core::{
    DependencyPin, Framework, PackageManager, ProductConfig, ScaffoldError, UpdateCheck,
};
use std::collections::HashMap;
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Connector library injected into every generated project
pub const CONNECTOR_PACKAGE: &str = "@ckb-ccc/connector-react";

/// Connector version pinned unless `--connector-version` says otherwise
pub const CONNECTOR_VERSION: &str = "^1.0.0";

/// Log filter variable (e.g. `CREATE_CCC_APP_LOG=debug`)
const LOG_ENV: &str = "CREATE_CCC_APP_LOG";

/// CCC product configuration
#[derive(Clone)]
pub struct CccConfig;

impl ProductConfig for CccConfig {
    fn name(&self) -> &'static str {
        "create-ccc-app"
    }

    fn display_name(&self) -> &'static str {
        "Create CCC App"
    }

    fn frameworks(&self) -> &'static [Framework] {
        &[Framework::Next15, Framework::Next14, Framework::React]
    }

    fn pinned_dependencies(&self) -> Vec<DependencyPin> {
        vec![DependencyPin::new(CONNECTOR_PACKAGE, CONNECTOR_VERSION)]
    }

    fn templates_env(&self) -> &'static str {
        "CREATE_CCC_APP_TEMPLATES"
    }

    fn bundled_templates_dir(&self) -> PathBuf {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates"))
    }

    fn default_project_name(&self) -> &'static str {
        "my-ckb-app"
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-ccc-app")]
#[command(about = "CLI for scaffolding CCC-connected React and Next.js apps")]
#[command(override_usage = "create-ccc-app [directory] [options]")]
#[command(version, disable_version_flag = true)]
pub struct Args {
    /// Project directory to create
    pub directory: Option<String>,

    /// Output the current version of create-ccc-app.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// Use TypeScript. (default)
    #[arg(long = "typescript", visible_alias = "ts")]
    pub typescript: bool,

    /// Use JavaScript.
    #[arg(long = "javascript", visible_alias = "js")]
    pub javascript: bool,

    /// Initialize as a Create React App (CRA) project.
    #[arg(long = "react", visible_alias = "cra")]
    pub react: bool,

    /// Initialize as a Create Next App (CNA) project using the latest supported Next.js.
    #[arg(long = "next", visible_alias = "cna")]
    pub next: bool,

    /// Initialize as a Create Next App (CNA) v14 project.
    #[arg(long = "next14", visible_alias = "cna14")]
    pub next14: bool,

    /// Initialize as a Create Next App (CNA) v15 project.
    #[arg(long = "next15", visible_alias = "cna15")]
    pub next15: bool,

    /// Explicitly tell the CLI to bootstrap the application using npm.
    #[arg(long = "use-npm")]
    pub use_npm: bool,

    /// Explicitly tell the CLI to bootstrap the application using pnpm.
    #[arg(long = "use-pnpm")]
    pub use_pnpm: bool,

    /// Explicitly tell the CLI to bootstrap the application using Yarn.
    #[arg(long = "use-yarn")]
    pub use_yarn: bool,

    /// Explicitly tell the CLI to bootstrap the application using Bun.
    #[arg(long = "use-bun")]
    pub use_bun: bool,

    /// Explicitly tell the CLI to skip installing packages.
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Version of @ckb-ccc/connector-react to pin in package.json.
    #[arg(long = "connector-version", value_name = "VERSION")]
    pub connector_version: Option<String>,

    /// Local directory to use for templates instead of the bundled ones (for development use)
    #[arg(long = "template-dir", value_name = "PATH")]
    pub template_dir: Option<PathBuf>,

    /// Positional arguments after the directory are accepted and ignored
    #[arg(hide = true)]
    extra: Vec<String>,
}

impl Args {
    /// First framework flag set (react > next14 > next15 > next)
    pub fn framework(&self) -> Option<Framework> {
        [
            (self.react, Framework::React),
            (self.next14, Framework::Next14),
            (self.next15, Framework::Next15),
            (self.next, Framework::LATEST_NEXT),
        ]
        .into_iter()
        .find_map(|(set, framework)| set.then_some(framework))
    }

    pub fn package_manager(&self) -> Option<PackageManager> {
        PackageManager::from_flags(self.use_npm, self.use_pnpm, self.use_yarn, self.use_bun)
    }

    pub fn into_create_args(self, config: &CccConfig) -> CreateArgs {
        let mut pins = config.pinned_dependencies();
        if let Some(version) = &self.connector_version {
            for pin in pins.iter_mut().filter(|p| p.name == CONNECTOR_PACKAGE) {
                pin.version = version.clone();
            }
        }

        CreateArgs {
            template_dir: self.template_dir.clone(),
            directory: self.directory.clone(),
            typescript: self.typescript,
            javascript: self.javascript,
            framework: self.framework(),
            package_manager: self.package_manager(),
            skip_install: self.skip_install,
            pins,
        }
    }
}

/// Drop flags clap doesn't know so they never fail the parse or turn into
/// the positional directory (e.g. `--no-git`).
fn tolerate_unknown_flags<I>(argv: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let command = Args::command();
    // flag name -> takes a value
    let mut longs: HashMap<String, bool> = HashMap::from([("help".to_string(), false)]);
    let mut shorts: HashMap<char, bool> = HashMap::from([('h', false)]);
    for arg in command.get_arguments() {
        let takes_value = arg.get_action().takes_values();
        if let Some(long) = arg.get_long() {
            longs.insert(long.to_string(), takes_value);
        }
        for alias in arg.get_all_aliases().unwrap_or_default() {
            longs.insert(alias.to_string(), takes_value);
        }
        if let Some(short) = arg.get_short() {
            shorts.insert(short, takes_value);
        }
    }

    let mut out = Vec::new();
    let mut iter = argv.into_iter();
    if let Some(bin) = iter.next() {
        out.push(bin);
    }

    let mut expect_value = false;
    let mut positional_only = false;
    for token in iter {
        let text = token.to_string_lossy().into_owned();

        if expect_value || positional_only {
            expect_value = false;
            out.push(token);
            continue;
        }
        if text == "--" {
            positional_only = true;
            out.push(token);
            continue;
        }

        if let Some(flag) = text.strip_prefix("--") {
            let (name, inline_value) = match flag.split_once('=') {
                Some((name, _)) => (name, true),
                None => (flag, false),
            };
            match longs.get(name) {
                Some(takes_value) => {
                    expect_value = *takes_value && !inline_value;
                    out.push(token);
                }
                None => tracing::debug!(flag = %text, "ignoring unknown option"),
            }
        } else if let Some(cluster) = text.strip_prefix('-').filter(|c| !c.is_empty()) {
            if cluster.chars().all(|c| shorts.contains_key(&c)) {
                expect_value = cluster
                    .chars()
                    .last()
                    .is_some_and(|c| shorts.get(&c).copied().unwrap_or(false));
                out.push(token);
            } else {
                tracing::debug!(flag = %text, "ignoring unknown option");
            }
        } else {
            out.push(token);
        }
    }

    out
}

/// Parse the filtered command line. Help and version exit 0, anything else
/// clap rejects exits 1.
fn parse_args<I>(argv: I) -> Args
where
    I: IntoIterator<Item = OsString>,
{
    match Args::try_parse_from(tolerate_unknown_flags(argv)) {
        Ok(args) => {
            if !args.extra.is_empty() {
                tracing::debug!(extra = ?args.extra, "ignoring extra arguments");
            }
            args
        }
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .try_init();
}

/// Print a short diagnostic for a failed run and return its exit code
fn report_error(config: &CccConfig, error: &anyhow::Error) -> i32 {
    let Some(scaffold_error) = error.downcast_ref::<ScaffoldError>() else {
        eprintln!();
        eprintln!("{}", "Unexpected error. Please report it as a bug:".red());
        eprintln!("  {:#}", error);
        eprintln!();
        return 1;
    };

    match scaffold_error {
        ScaffoldError::InvalidName { name, problems } => {
            eprintln!(
                "Could not create a project called {} because of npm naming restrictions:",
                format!("\"{}\"", name).red()
            );
            for problem in problems {
                eprintln!("    {} {}", "*".red().bold(), problem);
            }
        }
        ScaffoldError::MissingProjectName => {
            let bin = config.name();
            eprintln!();
            eprintln!("Please specify the project directory:");
            eprintln!("  {} {}", bin.cyan(), "<project-directory>".green());
            eprintln!("For example:");
            eprintln!("  {} {}", bin.cyan(), config.default_project_name().green());
            eprintln!();
            eprintln!("Run {} to see all options.", format!("{} --help", bin).cyan());
        }
        ScaffoldError::DirectoryConflict { name } => {
            eprintln!(
                "Could not create a project called {} because a project with the same name already exists.",
                format!("\"{}\"", name).red()
            );
        }
        ScaffoldError::InstallFailure { command, code } => {
            tracing::debug!(code, "install failed");
            println!();
            println!("Aborting installation.");
            println!("  {} has failed.", command.cyan());
            println!();
        }
        ScaffoldError::PromptCancelled => {
            eprintln!("Exiting.");
        }
        ScaffoldError::TemplateNotFound { .. }
        | ScaffoldError::MissingManifest { .. }
        | ScaffoldError::MalformedManifest { .. } => {
            eprintln!("{}", scaffold_error.to_string().red());
        }
    }

    scaffold_error.exit_code()
}

#[tokio::main]
async fn main() {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        create_app_core::tui::restore_cursor();
        default_panic(info);
    }));

    init_tracing();

    // Handle Ctrl+C / SIGTERM gracefully
    let cancel = Cancellation::new();
    if let Err(e) = cancel.install_handler() {
        tracing::debug!(error = %e, "could not install signal handler");
    }

    let args = parse_args(std::env::args_os());
    let config = CccConfig;
    let create_args = args.into_create_args(&config);
    let package_manager = create_args.resolved_package_manager();

    let update = UpdateCheck::spawn(config.package_name(), CLI_VERSION, config.user_agent());

    let code = {
        let _terminal = TerminalGuard;
        match create_app_core::run(&config, create_args, &cancel).await {
            Ok(_) => 0,
            Err(e) => report_error(&config, &e),
        }
    };

    update.notify(package_manager).await;
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(tokens: &[&str]) -> Vec<OsString> {
        std::iter::once("create-ccc-app")
            .chain(tokens.iter().copied())
            .map(OsString::from)
            .collect()
    }

    fn parse(tokens: &[&str]) -> Args {
        Args::try_parse_from(tolerate_unknown_flags(argv(tokens))).unwrap()
    }

    #[test]
    fn test_short_aliases() {
        let args = parse(&["my-app", "--js", "--cra", "--use-npm", "--skip-install"]);
        assert_eq!(args.directory.as_deref(), Some("my-app"));
        assert!(args.javascript);
        assert_eq!(args.framework(), Some(Framework::React));
        assert_eq!(args.package_manager(), Some(PackageManager::Npm));
        assert!(args.skip_install);
    }

    #[test]
    fn test_framework_priority() {
        assert_eq!(parse(&["--next"]).framework(), Some(Framework::Next15));
        assert_eq!(parse(&["--cna14"]).framework(), Some(Framework::Next14));
        assert_eq!(
            parse(&["--next", "--react"]).framework(),
            Some(Framework::React)
        );
        assert_eq!(parse(&[]).framework(), None);
    }

    #[test]
    fn test_package_manager_priority() {
        let args = parse(&["--use-bun", "--use-yarn"]);
        assert_eq!(args.package_manager(), Some(PackageManager::Yarn));
    }

    #[test]
    fn test_unknown_flags_are_tolerated() {
        let args = parse(&["--no-git", "my-app", "--eslint", "--tailwind=yes", "-x", "--ts"]);
        assert_eq!(args.directory.as_deref(), Some("my-app"));
        assert!(args.typescript);
    }

    #[test]
    fn test_negated_flag_never_becomes_directory() {
        let args = parse(&["--no-install"]);
        assert_eq!(args.directory, None);
    }

    #[test]
    fn test_value_flags_keep_their_values() {
        let args = parse(&["--connector-version", "1.2.3", "app", "--template-dir=/tmp/t"]);
        assert_eq!(args.connector_version.as_deref(), Some("1.2.3"));
        assert_eq!(args.directory.as_deref(), Some("app"));
        assert_eq!(args.template_dir, Some(PathBuf::from("/tmp/t")));
    }

    #[test]
    fn test_extra_positionals_are_ignored() {
        let args = parse(&["my-app", "extra", "--js", "more", "--cra"]);
        assert_eq!(args.directory.as_deref(), Some("my-app"));
        assert!(args.javascript);
        assert_eq!(args.framework(), Some(Framework::React));
    }

    #[test]
    fn test_missing_value_is_a_parse_error() {
        let tokens = tolerate_unknown_flags(argv(&["my-app", "--connector-version"]));
        let err = Args::try_parse_from(tokens).unwrap_err();
        assert!(!matches!(
            err.kind(),
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
        ));
    }

    #[test]
    fn test_version_flag_is_lowercase_v() {
        let err = Args::try_parse_from(tolerate_unknown_flags(argv(&["-v"]))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_connector_version_override() {
        let config = CccConfig;
        let create = parse(&["--connector-version", "1.5.0"]).into_create_args(&config);
        assert_eq!(
            create.pins,
            vec![DependencyPin::new(CONNECTOR_PACKAGE, "1.5.0")]
        );

        let create = parse(&[]).into_create_args(&config);
        assert_eq!(
            create.pins,
            vec![DependencyPin::new(CONNECTOR_PACKAGE, CONNECTOR_VERSION)]
        );
    }

    #[test]
    fn test_frameworks_list_next_first() {
        let frameworks = CccConfig.frameworks();
        assert_eq!(frameworks.last(), Some(&Framework::React));
        assert!(frameworks[..frameworks.len() - 1]
            .iter()
            .all(|f| f.kind() == create_app_core::FrameworkKind::Next));
    }

    #[test]
    fn test_default_project_name() {
        assert_eq!(CccConfig.default_project_name(), "my-ckb-app");
    }

    #[test]
    fn test_react_templates_configure_webpack_fallbacks() {
        let root = CccConfig.bundled_templates_dir();
        for key in ["react-js", "react-ts"] {
            let craco = std::fs::read_to_string(root.join(key).join("craco.config.js")).unwrap();
            assert!(craco.contains("require.resolve(\"stream-browserify\")"), "{key}");
            assert!(craco.contains("fullySpecified: false"), "{key}");
            assert!(craco.contains("\".tsx\""), "{key}");

            let manifest = std::fs::read_to_string(root.join(key).join("package.json")).unwrap();
            let manifest: serde_json::Value = serde_json::from_str(&manifest).unwrap();
            assert!(manifest["dependencies"]["stream-browserify"].is_string(), "{key}");
        }
    }

    #[test]
    fn test_bundled_templates_exist() {
        let root = CccConfig.bundled_templates_dir();
        for framework in CccConfig.frameworks() {
            for language in CccConfig.languages() {
                let descriptor = create_app_core::TemplateDescriptor::new(*framework, *language);
                let dir = root.join(descriptor.key());
                assert!(dir.join("package.json").is_file(), "missing {}", dir.display());
            }
        }
    }
}
