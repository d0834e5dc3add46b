//! Embedded scaffolding templates for `trellis init` and `trellis new`.
//!
//! Templates are TOML descriptors compiled into the binary via `include_str!`.
//! Each declares the `Trellis.toml` content, directories and extra files to
//! generate. Simple `{{variable}}` interpolation is performed at render time.
//! Existing files are never overwritten.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use trellis_util::errors::TrellisError;

use crate::catalog::Catalog;
use crate::MANIFEST_FILE;

const WORKSPACE_TEMPLATE: &str = include_str!("../templates/workspace.toml");
const MEMBER_TEMPLATE: &str = include_str!("../templates/member.toml");

/// File name of the catalog written next to a freshly initialized root manifest.
pub const CATALOG_FILE: &str = "catalog.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateMeta {
    pub name: String,
    pub description: String,
}

/// Raw `Trellis.toml` content with `{{variable}}` placeholders.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestTemplate {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryEntry {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub content: String,
}

/// A scaffolding template parsed from a TOML descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectTemplate {
    pub template: TemplateMeta,
    pub manifest: ManifestTemplate,
    #[serde(default)]
    pub directories: Vec<DirectoryEntry>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// Variables available for `{{variable}}` interpolation.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    vars: BTreeMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

/// Replace all `{{key}}` placeholders in `input` with values from `ctx`.
/// Unknown keys are left intact.
pub fn interpolate(input: &str, ctx: &TemplateContext) -> String {
    let mut result = input.to_string();
    for (key, value) in &ctx.vars {
        let placeholder = format!("{{{{{key}}}}}");
        result = result.replace(&placeholder, value);
    }
    result
}

impl ProjectTemplate {
    pub fn parse_toml(toml_str: &str) -> Result<Self, TrellisError> {
        toml::from_str(toml_str).map_err(|e| TrellisError::Generic {
            message: format!("Failed to parse template: {e}"),
        })
    }

    /// The root workspace template used by `trellis init`.
    pub fn workspace() -> Result<Self, TrellisError> {
        Self::parse_toml(WORKSPACE_TEMPLATE)
    }

    /// The member template used by `trellis new`.
    pub fn member() -> Result<Self, TrellisError> {
        Self::parse_toml(MEMBER_TEMPLATE)
    }

    /// Render the template into `root`. Returns the paths written, relative
    /// to `root`; files that already exist are skipped.
    pub fn render(&self, root: &Path, ctx: &TemplateContext) -> Result<Vec<String>, TrellisError> {
        let mut written = Vec::new();
        for dir in &self.directories {
            std::fs::create_dir_all(root.join(&dir.path))?;
        }
        if write_new(
            &root.join(MANIFEST_FILE),
            &interpolate(&self.manifest.content, ctx),
        )? {
            written.push(MANIFEST_FILE.to_string());
        }
        for file in &self.files {
            if write_new(&root.join(&file.path), &interpolate(&file.content, ctx))? {
                written.push(file.path.clone());
            }
        }
        Ok(written)
    }
}

/// Render the workspace template plus the built-in catalog file.
pub fn render_workspace(root: &Path, group: &str) -> Result<Vec<String>, TrellisError> {
    let mut ctx = TemplateContext::new();
    ctx.set("group", group);
    let mut written = ProjectTemplate::workspace()?.render(root, &ctx)?;
    if write_new(&root.join(CATALOG_FILE), Catalog::builtin_source())? {
        written.push(CATALOG_FILE.to_string());
    }
    Ok(written)
}

/// Render the member template into `dir`.
pub fn render_member(dir: &Path, module_name: &str) -> Result<Vec<String>, TrellisError> {
    let mut ctx = TemplateContext::new();
    ctx.set("module_name", module_name);
    ProjectTemplate::member()?.render(dir, &ctx)
}

fn write_new(path: &Path, content: &str) -> Result<bool, TrellisError> {
    if path.exists() {
        tracing::debug!("Skipping existing {}", path.display());
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(true)
}
