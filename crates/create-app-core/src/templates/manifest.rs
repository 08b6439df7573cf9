//! package.json reading and patching

use crate::error::ScaffoldError;
use crate::project::DependencyPin;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Manifest file name at the root of every template
pub const MANIFEST_FILE: &str = "package.json";

/// A parsed package.json. Key order is kept as read.
#[derive(Debug, Clone)]
pub struct PackageManifest {
    path: PathBuf,
    fields: Map<String, Value>,
}

impl PackageManifest {
    /// Read `<project_dir>/package.json`
    pub async fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(ScaffoldError::MissingManifest { path }.into());
        }

        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::parse(path, &content)?)
    }

    /// Parse manifest text; the top level must be an object
    pub fn parse(path: PathBuf, content: &str) -> Result<Self, ScaffoldError> {
        match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(fields)) => Ok(Self { path, fields }),
            Ok(_) => Err(ScaffoldError::MalformedManifest {
                path,
                source: <serde_json::Error as serde::de::Error>::custom(
                    "expected a JSON object at the top level",
                ),
            }),
            Err(source) => Err(ScaffoldError::MalformedManifest { path, source }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    pub fn set_name(&mut self, name: &str) {
        self.fields
            .insert("name".to_string(), Value::String(name.to_string()));
    }

    /// Force `pin` into `dependencies`, replacing any existing version
    pub fn pin_dependency(&mut self, pin: &DependencyPin) {
        let deps = self
            .fields
            .entry("dependencies")
            .or_insert_with(|| Value::Object(Map::new()));
        if !deps.is_object() {
            *deps = Value::Object(Map::new());
        }
        if let Value::Object(deps) = deps {
            deps.insert(pin.name.clone(), Value::String(pin.version.clone()));
        }
    }

    /// `dependencies` as (name, version) pairs
    pub fn dependencies(&self) -> Vec<(String, String)> {
        self.section("dependencies")
    }

    /// `devDependencies` as (name, version) pairs
    pub fn dev_dependencies(&self) -> Vec<(String, String)> {
        self.section("devDependencies")
    }

    fn section(&self, key: &str) -> Vec<(String, String)> {
        self.fields
            .get(key)
            .and_then(Value::as_object)
            .map(|deps| {
                deps.iter()
                    .map(|(name, version)| {
                        let version = match version {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (name.clone(), version)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Two-space indented JSON with a trailing newline
    pub fn to_json_string(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(&self.fields)
            .context("Failed to serialize package.json")?;
        out.push('\n');
        Ok(out)
    }

    /// Write back to the file it was loaded from
    pub async fn save(&self) -> Result<()> {
        let content = self.to_json_string()?;
        fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}
