//! Operation: scaffold a workspace root.

use std::path::Path;

use trellis_core::template::render_workspace;
use trellis_core::MANIFEST_FILE;
use trellis_util::errors::TrellisError;

/// Write `Trellis.toml`, the default catalog and `trellis.properties` into
/// `dir`. Existing files are left untouched; the returned list names the
/// files actually written.
pub fn init(dir: &Path, group: &str) -> miette::Result<Vec<String>> {
    if group.trim().is_empty() || group.contains(char::is_whitespace) {
        return Err(TrellisError::Generic {
            message: format!("Invalid group '{group}'"),
        }
        .into());
    }
    if dir.join(MANIFEST_FILE).is_file() {
        tracing::debug!("{} already has a {MANIFEST_FILE}", dir.display());
    }
    std::fs::create_dir_all(dir).map_err(TrellisError::Io)?;
    Ok(render_workspace(dir, group)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::manifest::RootManifest;

    #[test]
    fn init_writes_a_loadable_workspace() {
        let tmp = tempfile::tempdir().unwrap();
        let written = init(tmp.path(), "cc.example").unwrap();
        assert!(written.contains(&MANIFEST_FILE.to_string()));
        assert!(written.contains(&"trellis.properties".to_string()));

        let manifest = RootManifest::from_path(&tmp.path().join(MANIFEST_FILE)).unwrap();
        assert_eq!(manifest.project.group, "cc.example");
        assert_eq!(manifest.project.version, "0.1.0-SNAPSHOT");
    }

    #[test]
    fn init_never_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(MANIFEST_FILE), "# mine\n").unwrap();
        let written = init(tmp.path(), "cc.example").unwrap();
        assert!(!written.contains(&MANIFEST_FILE.to_string()));
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(MANIFEST_FILE)).unwrap(),
            "# mine\n"
        );
        assert!(init(tmp.path(), "cc.example").unwrap().is_empty());
    }

    #[test]
    fn init_rejects_blank_group() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(init(tmp.path(), " ").is_err());
    }
}
