//! Charm-style CLI prompts using cliclack
//!
//! Drives the whole create workflow: name, directory guard, language,
//! framework, template materialization, install, next steps. Each stage
//! either extends the [`ProjectDraft`] or stops the run with an error.

use super::cancel::{Cancellation, PromptResultExt};
use crate::error::ScaffoldError;
use crate::naming;
use crate::probe;
use crate::product::ProductConfig;
use crate::project::{
    project_name, resolve_directory, DependencyPin, Framework, FrameworkKind, Language,
    ProjectDraft, ProjectRequest,
};
use crate::runtime::{self, PackageManager};
use crate::templates::{self, PackageManifest, TemplateDescriptor, TemplateRegistry};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Local directory to use for templates instead of the bundled ones
    pub template_dir: Option<PathBuf>,

    /// Project directory to create (positional)
    pub directory: Option<String>,

    /// `--ts`
    pub typescript: bool,

    /// `--js`
    pub javascript: bool,

    /// Framework chosen by flag
    pub framework: Option<Framework>,

    /// Package manager chosen by `--use-*` flag
    pub package_manager: Option<PackageManager>,

    /// Skip `<pm> install`
    pub skip_install: bool,

    /// Dependencies forced into package.json
    pub pins: Vec<DependencyPin>,
}

impl CreateArgs {
    /// Explicit flag, else whatever invoked us (npm_config_user_agent)
    pub fn resolved_package_manager(&self) -> PackageManager {
        self.package_manager
            .unwrap_or_else(PackageManager::detect_from_env)
    }

    /// Trimmed positional directory, if non-empty
    pub fn directory_input(&self) -> Option<&str> {
        self.directory
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(
    config: &C,
    args: CreateArgs,
    cancel: &Cancellation,
) -> Result<ProjectRequest> {
    cliclack::intro(config.display_name())?;

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let package_manager = args.resolved_package_manager();
    let registry = TemplateRegistry::from_config(config, args.template_dir.clone());

    let draft = ProjectDraft::new(package_manager, args.skip_install).with_pins(args.pins.clone());

    // Step 1: Project name / directory
    let input = select_project_name(config, &args, &cwd, cancel)?;
    let draft = draft.with_directory(&cwd, &input);
    let name = draft.name().unwrap_or_default();

    // Step 2: Validate the final name
    check_name(&name)?;

    // Step 3: Refuse to write into a populated directory
    if let Some(dir) = draft.directory() {
        guard_directory(dir, &name)?;
    }

    // Step 4: Language
    let language = select_language(&args, cancel)?;
    let draft = draft.with_language(language);

    // Step 5: Framework
    let framework = select_framework(&registry, &args, cancel)?;
    let draft = draft.with_framework(framework);

    let request = draft
        .build()
        .context("Project request is incomplete")?;

    // Step 6: Copy the template and patch package.json
    let manifest = create_project(&registry, &request).await?;

    // Step 7: Install dependencies (or explain how to)
    let display_dir = display_path(&cwd, &request.directory);
    if request.skip_install {
        print_manual_install(&request, &display_dir);
    } else {
        install_dependencies(&request, &manifest).await?;
    }

    // Step 8: Show next steps
    print_next_steps(&request, &display_dir)?;

    Ok(request)
}

fn select_project_name<C: ProductConfig>(
    config: &C,
    args: &CreateArgs,
    cwd: &Path,
    cancel: &Cancellation,
) -> Result<String> {
    if let Some(dir) = args.directory_input() {
        return Ok(dir.to_string());
    }

    let prompt_cwd = cwd.to_path_buf();
    let input: String = {
        let _guard = cancel.prompt();
        cliclack::input("What is your project named?")
            .placeholder(config.default_project_name())
            .default_input(config.default_project_name())
            .validate(move |input: &String| prompt_name_check(&prompt_cwd, input))
            .interact()
            .or_cancelled()?
    };

    let input = input.trim();
    if input.is_empty() {
        return Err(ScaffoldError::MissingProjectName.into());
    }
    Ok(input.to_string())
}

/// Inline validation for the name prompt
fn prompt_name_check(cwd: &Path, input: &str) -> Result<(), String> {
    let name = project_name(&resolve_directory(cwd, input));
    let validation = naming::validate(&name);
    if validation.valid {
        Ok(())
    } else {
        Err(format!(
            "Invalid project name: {}",
            validation.first_problem().unwrap_or_default()
        ))
    }
}

fn check_name(name: &str) -> Result<()> {
    let validation = naming::validate(name);
    if validation.valid {
        return Ok(());
    }
    Err(ScaffoldError::InvalidName {
        name: name.to_string(),
        problems: validation.problems,
    }
    .into())
}

fn guard_directory(dir: &Path, name: &str) -> Result<()> {
    if probe::exists(dir) && !probe::is_empty(dir)? {
        return Err(ScaffoldError::DirectoryConflict {
            name: name.to_string(),
        }
        .into());
    }
    Ok(())
}

fn select_language(args: &CreateArgs, cancel: &Cancellation) -> Result<Language> {
    if let Some(language) = Language::from_flags(args.typescript, args.javascript) {
        cliclack::log::info(format!("Using {}", language))?;
        return Ok(language);
    }

    let _guard = cancel.prompt();
    let typescript: bool = cliclack::confirm(format!(
        "Would you like to use {}?",
        "TypeScript".blue()
    ))
    .initial_value(true)
    .interact()
    .or_cancelled()?;

    Ok(if typescript {
        Language::TypeScript
    } else {
        Language::JavaScript
    })
}

fn select_framework(
    registry: &TemplateRegistry,
    args: &CreateArgs,
    cancel: &Cancellation,
) -> Result<Framework> {
    if let Some(framework) = args.framework {
        cliclack::log::info(format!("Using {}", framework))?;
        return Ok(framework);
    }

    let frameworks = registry.frameworks();
    let Some(first) = frameworks.first() else {
        anyhow::bail!("You must select a framework to proceed.");
    };

    let mut select = cliclack::select("Select a framework to use:");
    for framework in frameworks {
        select = select.item(*framework, framework.display_name(), "");
    }

    let _guard = cancel.prompt();
    let framework: Framework = select.initial_value(*first).interact().or_cancelled()?;
    Ok(framework)
}

async fn create_project(
    registry: &TemplateRegistry,
    request: &ProjectRequest,
) -> Result<PackageManifest> {
    let descriptor = TemplateDescriptor::new(request.framework, request.language);

    cliclack::log::step(format!("Using {}.", request.package_manager).bold())?;
    cliclack::log::info(format!(
        "Initializing project with template: {}",
        descriptor.key().cyan()
    ))?;

    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    match templates::materialize(
        registry,
        &descriptor,
        &request.directory,
        &request.name,
        &request.pins,
    )
    .await
    {
        Ok(manifest) => {
            spinner.stop(format!("Updated {}/package.json.", request.name).green());
            cliclack::log::success(format!("Project {} created!", request.name))?;
            Ok(manifest)
        }
        Err(e) => {
            spinner.stop("Failed to create project");
            cliclack::log::error(format!("Project {} could not be created.", request.name))?;
            Err(e)
        }
    }
}

fn print_manual_install(request: &ProjectRequest, display_dir: &str) {
    println!();
    println!("Skip install the dependencies, we suggest that you begin by typing:");
    println!();
    println!("  {} {}", "cd".cyan(), display_dir);
    println!("  {}", request.package_manager.install_command().cyan());
    println!();
}

async fn install_dependencies(request: &ProjectRequest, manifest: &PackageManifest) -> Result<()> {
    println!();
    println!("Installing dependencies:");
    for (name, version) in manifest.dependencies() {
        println!("- {}: {}", name.cyan(), version.yellow());
    }

    println!();
    println!("Installing devDependencies:");
    for (name, version) in manifest.dev_dependencies() {
        println!("- {}: {}", name.cyan(), version.yellow());
    }

    println!();
    println!("Installing packages. This might take a couple of minutes.");
    println!();

    runtime::install(request.package_manager, &request.directory).await?;

    println!("Packages installed.");
    println!();
    Ok(())
}

/// One `<command>` / description pair in the next-steps block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptHint {
    pub command: String,
    pub description: &'static str,
}

/// Scripts worth mentioning for a framework, plus the one to run first
pub fn script_hints(framework: Framework, pm: PackageManager) -> (Vec<ScriptHint>, String) {
    let start = format!("{} start", pm.command());
    let build = ScriptHint {
        command: pm.run_script("build"),
        description: "Builds the app for production.",
    };

    match framework.kind() {
        FrameworkKind::Next => {
            let dev = pm.run_script("dev");
            (
                vec![
                    ScriptHint {
                        command: dev.clone(),
                        description: "Starts the development server.",
                    },
                    build,
                    ScriptHint {
                        command: start,
                        description: "Runs the built app in production mode.",
                    },
                ],
                dev,
            )
        }
        FrameworkKind::React => (
            vec![
                ScriptHint {
                    command: start.clone(),
                    description: "Starts the development server.",
                },
                build,
            ],
            start,
        ),
    }
}

fn print_next_steps(request: &ProjectRequest, display_dir: &str) -> Result<()> {
    let (hints, first) = script_hints(request.framework, request.package_manager);

    println!("Inside the project directory, you can run several commands:");
    println!();
    for hint in &hints {
        println!("  {}", hint.command.cyan());
        println!("    {}", hint.description);
        println!();
    }

    println!("We suggest that you begin by typing:");
    println!();
    println!("  {} {}", "cd".cyan(), display_dir);
    println!("  {}", first.cyan());
    println!();

    cliclack::outro(format!(
        "{} Created {} at {}",
        "Success!".green(),
        request.name,
        request.directory.display()
    ))?;

    Ok(())
}

/// Path as the user would type it from `cwd`
fn display_path(cwd: &Path, dir: &Path) -> String {
    dir.strip_prefix(cwd)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or(dir)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_input_trims() {
        let args = CreateArgs {
            directory: Some("  my-app  ".to_string()),
            ..CreateArgs::default()
        };
        assert_eq!(args.directory_input(), Some("my-app"));

        let blank = CreateArgs {
            directory: Some("   ".to_string()),
            ..CreateArgs::default()
        };
        assert_eq!(blank.directory_input(), None);
    }

    #[test]
    fn test_explicit_package_manager_wins() {
        let args = CreateArgs {
            package_manager: Some(PackageManager::Bun),
            ..CreateArgs::default()
        };
        assert_eq!(args.resolved_package_manager(), PackageManager::Bun);
    }

    #[test]
    fn test_prompt_name_check() {
        let cwd = Path::new("/work");
        assert!(prompt_name_check(cwd, "my-app").is_ok());
        assert!(prompt_name_check(cwd, "apps/my-app").is_ok());
        assert_eq!(
            prompt_name_check(cwd, "MyApp"),
            Err("Invalid project name: name can no longer contain capital letters".to_string())
        );
    }

    #[test]
    fn test_check_name_collects_problems() {
        let err = check_name("Bad Name").unwrap_err();
        match err.downcast_ref::<ScaffoldError>() {
            Some(ScaffoldError::InvalidName { name, problems }) => {
                assert_eq!(name, "Bad Name");
                assert!(problems.len() >= 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_guard_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("my-app");

        // missing and empty directories are fine
        assert!(guard_directory(&dir, "my-app").is_ok());
        std::fs::create_dir(&dir).unwrap();
        assert!(guard_directory(&dir, "my-app").is_ok());

        std::fs::write(dir.join("README.md"), "hi").unwrap();
        let err = guard_directory(&dir, "my-app").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScaffoldError>(),
            Some(ScaffoldError::DirectoryConflict { name }) if name == "my-app"
        ));
    }

    #[test]
    fn test_next_hints() {
        let (hints, first) = script_hints(Framework::Next15, PackageManager::Npm);
        let commands: Vec<&str> = hints.iter().map(|h| h.command.as_str()).collect();
        assert_eq!(commands, vec!["npm run dev", "npm run build", "npm start"]);
        assert_eq!(first, "npm run dev");

        let (_, first) = script_hints(Framework::Next14, PackageManager::Yarn);
        assert_eq!(first, "yarn dev");
    }

    #[test]
    fn test_react_hints() {
        let (hints, first) = script_hints(Framework::React, PackageManager::Yarn);
        let commands: Vec<&str> = hints.iter().map(|h| h.command.as_str()).collect();
        assert_eq!(commands, vec!["yarn start", "yarn build"]);
        assert_eq!(first, "yarn start");
    }

    #[test]
    fn test_display_path() {
        let cwd = Path::new("/work");
        assert_eq!(display_path(cwd, Path::new("/work/my-app")), "my-app");
        assert_eq!(display_path(cwd, Path::new("/elsewhere/app")), "/elsewhere/app");
        assert_eq!(display_path(cwd, Path::new("/work")), "/work");
    }
}
