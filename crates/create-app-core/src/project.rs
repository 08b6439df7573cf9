//! Project request types
//!
//! A [`ProjectRequest`] is assembled from CLI flags and prompt answers through
//! a [`ProjectDraft`], one resolve step at a time. Once built it is never
//! mutated: template materialization and install only read it.

use crate::runtime::PackageManager;
use std::fmt;
use std::path::{Path, PathBuf};

/// Source language of the generated project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    TypeScript,
    JavaScript,
}

impl Language {
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::TypeScript => "TypeScript",
            Language::JavaScript => "JavaScript",
        }
    }

    /// Suffix used in template directory names
    pub fn template_suffix(&self) -> &'static str {
        match self {
            Language::TypeScript => "ts",
            Language::JavaScript => "js",
        }
    }

    /// Resolve from the `--ts` / `--js` flags. JavaScript wins if both are set.
    pub fn from_flags(typescript: bool, javascript: bool) -> Option<Self> {
        if javascript {
            Some(Language::JavaScript)
        } else if typescript {
            Some(Language::TypeScript)
        } else {
            None
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Framework family, used for next-steps hints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameworkKind {
    React,
    Next,
}

/// Concrete framework template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framework {
    React,
    Next14,
    Next15,
}

impl Framework {
    /// Latest Next.js release, picked by the bare `--next` flag
    pub const LATEST_NEXT: Framework = Framework::Next15;

    pub fn kind(&self) -> FrameworkKind {
        match self {
            Framework::React => FrameworkKind::React,
            Framework::Next14 | Framework::Next15 => FrameworkKind::Next,
        }
    }

    /// Prefix used in template directory names
    pub fn template_key(&self) -> &'static str {
        match self {
            Framework::React => "react",
            Framework::Next14 => "next14",
            Framework::Next15 => "next15",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Framework::React => "Create React App",
            Framework::Next14 => "Create Next App (Next.js) v14",
            Framework::Next15 => "Create Next App (Next.js) v15",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A dependency version forced into the generated package.json
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyPin {
    pub name: String,
    pub version: String,
}

impl DependencyPin {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Everything needed to materialize and bootstrap one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    /// Package name, i.e. the base name of `directory`
    pub name: String,
    /// Absolute project directory
    pub directory: PathBuf,
    pub language: Language,
    pub framework: Framework,
    pub package_manager: PackageManager,
    pub skip_install: bool,
    pub pins: Vec<DependencyPin>,
}

/// Partially resolved request
#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    directory: Option<PathBuf>,
    language: Option<Language>,
    framework: Option<Framework>,
    package_manager: Option<PackageManager>,
    skip_install: bool,
    pins: Vec<DependencyPin>,
}

impl ProjectDraft {
    pub fn new(package_manager: PackageManager, skip_install: bool) -> Self {
        Self {
            package_manager: Some(package_manager),
            skip_install,
            ..Self::default()
        }
    }

    /// Resolve `input` against `cwd` and record it as the project directory
    pub fn with_directory(self, cwd: &Path, input: &str) -> Self {
        Self {
            directory: Some(resolve_directory(cwd, input)),
            ..self
        }
    }

    pub fn with_language(self, language: Language) -> Self {
        Self {
            language: Some(language),
            ..self
        }
    }

    pub fn with_framework(self, framework: Framework) -> Self {
        Self {
            framework: Some(framework),
            ..self
        }
    }

    pub fn with_pins(self, pins: Vec<DependencyPin>) -> Self {
        Self { pins, ..self }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Package name derived from the directory
    pub fn name(&self) -> Option<String> {
        self.directory.as_deref().map(project_name)
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn framework(&self) -> Option<Framework> {
        self.framework
    }

    /// Finish the draft. Returns `None` if a stage was skipped.
    pub fn build(self) -> Option<ProjectRequest> {
        let directory = self.directory?;
        Some(ProjectRequest {
            name: project_name(&directory),
            directory,
            language: self.language?,
            framework: self.framework?,
            package_manager: self.package_manager?,
            skip_install: self.skip_install,
            pins: self.pins,
        })
    }
}

/// Join a user supplied path onto `cwd` and drop `.` / `..` components
pub fn resolve_directory(cwd: &Path, input: &str) -> PathBuf {
    let input = input.trim();
    let joined = if Path::new(input).is_absolute() {
        PathBuf::from(input)
    } else {
        cwd.join(input)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Base name of a project directory
pub fn project_name(directory: &Path) -> String {
    directory
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
