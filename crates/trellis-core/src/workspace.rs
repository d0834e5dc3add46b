use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use trellis_util::errors::TrellisError;

use crate::manifest::{MemberManifest, RootManifest};
use crate::MANIFEST_FILE;

/// A workspace member: one module directory with its own manifest.
#[derive(Debug, Clone)]
pub struct Member {
    /// Module name, unique within the workspace.
    pub name: String,
    /// Directory relative to the workspace root, as listed in `[workspace] members`.
    pub dir: String,
    pub manifest: MemberManifest,
}

/// A Trellis workspace: the root manifest and its members.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root_dir: PathBuf,
    pub manifest: RootManifest,
    pub members: Vec<Member>,
}

impl Workspace {
    /// Locate the workspace containing `start` by walking up to the nearest
    /// `Trellis.toml` that declares a `[project]`, then load it.
    pub fn discover(start: &Path) -> Result<Self, TrellisError> {
        let mut dir = start.to_path_buf();
        loop {
            let Some(root) = trellis_util::fs::find_ancestor_with(&dir, MANIFEST_FILE) else {
                return Err(TrellisError::manifest(format!(
                    "Could not find {MANIFEST_FILE} in {} or any parent directory",
                    start.display()
                )));
            };
            if is_root_manifest(&root.join(MANIFEST_FILE))? {
                return Self::load(&root);
            }
            match root.parent() {
                Some(parent) => dir = parent.to_path_buf(),
                None => {
                    return Err(TrellisError::manifest(format!(
                        "No {MANIFEST_FILE} with a [project] section above {}",
                        start.display()
                    )))
                }
            }
        }
    }

    /// Load the workspace rooted at `root_dir`.
    pub fn load(root_dir: &Path) -> Result<Self, TrellisError> {
        let manifest = RootManifest::from_path(&root_dir.join(MANIFEST_FILE))?;
        let mut names = BTreeSet::new();
        let mut members = Vec::with_capacity(manifest.workspace.members.len());
        for dir in &manifest.workspace.members {
            let path = root_dir.join(dir).join(MANIFEST_FILE);
            if !path.is_file() {
                return Err(TrellisError::manifest(format!(
                    "Workspace member '{dir}' has no {MANIFEST_FILE}"
                )));
            }
            let member_manifest = MemberManifest::from_path(&path, root_dir)?;
            let name = member_manifest
                .module
                .name
                .clone()
                .unwrap_or_else(|| default_module_name(dir));
            if !names.insert(name.clone()) {
                return Err(TrellisError::DuplicateKey {
                    kind: "module".to_string(),
                    key: name,
                });
            }
            members.push(Member {
                name,
                dir: dir.clone(),
                manifest: member_manifest,
            });
        }
        tracing::debug!(
            "Loaded workspace at {} with {} member(s)",
            root_dir.display(),
            members.len()
        );
        Ok(Self {
            root_dir: root_dir.to_path_buf(),
            manifest,
            members,
        })
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn member_dir(&self, member: &Member) -> PathBuf {
        self.root_dir.join(&member.dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root_dir.join(MANIFEST_FILE)
    }
}

/// The last path segment of a member directory.
pub fn default_module_name(dir: &str) -> String {
    dir.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(dir)
        .to_string()
}

fn is_root_manifest(path: &Path) -> Result<bool, TrellisError> {
    let content = std::fs::read_to_string(path)?;
    let value: toml::Table = toml::from_str(&content).map_err(|e| {
        TrellisError::manifest(format!("Failed to parse {}: {e}", path.display()))
    })?;
    Ok(value.contains_key("project"))
}
