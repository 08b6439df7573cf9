//! Template lookup on disk
//!
//! Templates live under a single root, one directory per
//! `<framework>-<language>` pair (e.g. `react-js`, `next15-ts`). The root
//! comes from, in order: an explicit override (the `--template-dir` flag),
//! the product's environment variable, a `templates/` directory next to the
//! executable, and finally the product's bundled directory.

use crate::error::ScaffoldError;
use crate::product::ProductConfig;
use crate::project::{Framework, Language};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifies one template tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateDescriptor {
    pub framework: Framework,
    pub language: Language,
}

impl TemplateDescriptor {
    pub fn new(framework: Framework, language: Language) -> Self {
        Self {
            framework,
            language,
        }
    }

    /// Directory name under the template root
    pub fn key(&self) -> String {
        format!(
            "{}-{}",
            self.framework.template_key(),
            self.language.template_suffix()
        )
    }
}

impl fmt::Display for TemplateDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Capability table plus the root directory the templates are read from
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    root: PathBuf,
    frameworks: Vec<Framework>,
    languages: Vec<Language>,
}

impl TemplateRegistry {
    pub fn new(root: PathBuf, frameworks: &[Framework], languages: &[Language]) -> Self {
        Self {
            root,
            frameworks: frameworks.to_vec(),
            languages: languages.to_vec(),
        }
    }

    /// Build the registry for a product, honoring `override_dir` first
    pub fn from_config<C: ProductConfig>(config: &C, override_dir: Option<PathBuf>) -> Self {
        let root = override_dir
            .or_else(|| std::env::var_os(config.templates_env()).map(PathBuf::from))
            .or_else(executable_templates_dir)
            .unwrap_or_else(|| config.bundled_templates_dir());
        tracing::debug!(root = %root.display(), "template root");
        Self::new(root, config.frameworks(), config.languages())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Frameworks in prompt order
    pub fn frameworks(&self) -> &[Framework] {
        &self.frameworks
    }

    /// Every framework/language pair the product offers
    pub fn descriptors(&self) -> Vec<TemplateDescriptor> {
        self.frameworks
            .iter()
            .flat_map(|f| {
                self.languages
                    .iter()
                    .map(move |l| TemplateDescriptor::new(*f, *l))
            })
            .collect()
    }

    pub fn offers(&self, descriptor: &TemplateDescriptor) -> bool {
        self.frameworks.contains(&descriptor.framework)
            && self.languages.contains(&descriptor.language)
    }

    /// Source directory for `descriptor`. Fails if the product doesn't offer
    /// it or the directory is absent.
    pub fn resolve(&self, descriptor: &TemplateDescriptor) -> Result<PathBuf, ScaffoldError> {
        let path = self.root.join(descriptor.key());
        if !self.offers(descriptor) || !path.is_dir() {
            return Err(ScaffoldError::TemplateNotFound {
                template: descriptor.key(),
                path,
            });
        }
        Ok(path)
    }
}

/// `templates/` beside the running binary, if present
fn executable_templates_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let dir = exe.parent()?.join("templates");
    dir.is_dir().then_some(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAMEWORKS: &[Framework] = &[Framework::Next15, Framework::React];
    const LANGUAGES: &[Language] = &[Language::TypeScript, Language::JavaScript];

    #[test]
    fn test_descriptor_keys() {
        assert_eq!(
            TemplateDescriptor::new(Framework::React, Language::JavaScript).key(),
            "react-js"
        );
        assert_eq!(
            TemplateDescriptor::new(Framework::Next14, Language::TypeScript).key(),
            "next14-ts"
        );
    }

    #[test]
    fn test_capability_table() {
        let registry = TemplateRegistry::new(PathBuf::from("/nowhere"), FRAMEWORKS, LANGUAGES);
        let keys: Vec<String> = registry.descriptors().iter().map(|d| d.key()).collect();
        assert_eq!(keys, vec!["next15-ts", "next15-js", "react-ts", "react-js"]);
        assert!(!registry.offers(&TemplateDescriptor::new(
            Framework::Next14,
            Language::TypeScript
        )));
    }

    #[test]
    fn test_resolve_existing_template() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("react-js")).unwrap();
        let registry = TemplateRegistry::new(tmp.path().to_path_buf(), FRAMEWORKS, LANGUAGES);

        let path = registry
            .resolve(&TemplateDescriptor::new(Framework::React, Language::JavaScript))
            .unwrap();
        assert_eq!(path, tmp.path().join("react-js"));
    }

    #[test]
    fn test_resolve_missing_template() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = TemplateRegistry::new(tmp.path().to_path_buf(), FRAMEWORKS, LANGUAGES);

        let err = registry
            .resolve(&TemplateDescriptor::new(Framework::React, Language::TypeScript))
            .unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::TemplateNotFound { ref template, .. } if template == "react-ts"
        ));
    }

    #[test]
    fn test_resolve_rejects_unoffered_framework() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("next14-ts")).unwrap();
        let registry = TemplateRegistry::new(tmp.path().to_path_buf(), FRAMEWORKS, LANGUAGES);

        assert!(registry
            .resolve(&TemplateDescriptor::new(Framework::Next14, Language::TypeScript))
            .is_err());
    }
}
