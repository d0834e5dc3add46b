use std::fs;
use trellis_util::fs::{ensure_dir, expand_entries, expand_home, find_ancestor_with, remove_path};

#[test]
fn test_find_ancestor_with_found_in_parent() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("Trellis.toml"), "").unwrap();
    let nested = tmp.path().join("core").join("src");
    fs::create_dir_all(&nested).unwrap();

    let found = find_ancestor_with(&nested, "Trellis.toml").unwrap();
    assert_eq!(found, tmp.path());
}

#[test]
fn test_find_ancestor_with_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(find_ancestor_with(tmp.path(), "no-such-file-anywhere.toml").is_none());
}

#[test]
fn test_ensure_dir_creates_nested() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("a").join("b");
    ensure_dir(&dir).unwrap();
    assert!(dir.is_dir());
    ensure_dir(&dir).unwrap();
}

#[test]
fn test_remove_path_file_dir_and_missing() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join(".project");
    let dir = tmp.path().join("out");
    fs::write(&file, "x").unwrap();
    fs::create_dir_all(dir.join("classes")).unwrap();

    assert!(remove_path(&file).unwrap());
    assert!(remove_path(&dir).unwrap());
    assert!(!remove_path(&tmp.path().join("bin")).unwrap());
    assert!(!file.exists());
    assert!(!dir.exists());
}

#[test]
fn test_expand_entries_plain_and_glob() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join(".project"), "").unwrap();
    fs::create_dir_all(tmp.path().join("out")).unwrap();
    fs::write(tmp.path().join("a.log"), "").unwrap();
    fs::write(tmp.path().join("b.log"), "").unwrap();
    fs::write(tmp.path().join("keep.txt"), "").unwrap();

    let entries = vec![
        "./.project".to_string(),
        "out".to_string(),
        "bin".to_string(),
        "*.log".to_string(),
    ];
    let found = expand_entries(tmp.path(), &entries).unwrap();
    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec![".project", "a.log", "b.log", "out"]);
}

#[test]
fn test_expand_home_plain_path_untouched() {
    assert_eq!(
        expand_home("/opt/repo"),
        std::path::PathBuf::from("/opt/repo")
    );
}
