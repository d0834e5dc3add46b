use trellis_core::dependency::DependencyScope;
use trellis_core::manifest::{MemberManifest, RootManifest};
use trellis_util::errors::TrellisError;

const ROOT: &str = r#"
[project]
group = "cc.before30.designpattern"
version = "0.1.0-SNAPSHOT"

[workspace]
members = ["core", "web"]

[catalog.versions]
slf4j = "1.7.26"

[catalog.libraries]
slf4j_api = { group = "org.slf4j", artifact = "slf4j-api", version.ref = "slf4j" }

[defaults]
plugins = ["java_library"]

[defaults.compiler]
args = ["-Xjsr305=strict"]

[defaults.lint]
reports = { xml = true }

[defaults.managed]
boms = ["org.example:platform:1.0"]
libraries = ["slf4j_api"]

[defaults.dependencies]
api = ["slf4j_api"]
test-runtime-only = ["org.junit.platform:junit-platform-engine:1.5.1"]

[boms."org.example:platform:1.0"]
"org.example:lib" = "1.2.3"
"#;

#[test]
fn parse_root_manifest() {
    let m = RootManifest::parse_toml(ROOT).unwrap();
    assert_eq!(m.project.group, "cc.before30.designpattern");
    assert_eq!(m.workspace.members, vec!["core", "web"]);
    assert_eq!(m.defaults.plugins, vec!["java_library"]);
    assert_eq!(m.defaults.compiler.args, vec!["-Xjsr305=strict"]);
    assert_eq!(m.defaults.compiler.jvm_target, "1.8");
    assert!(m.defaults.lint.reports.xml);
    assert!(m.defaults.lint.reports.html);
    assert_eq!(m.defaults.managed.boms, vec!["org.example:platform:1.0"]);
    assert_eq!(
        m.boms["org.example:platform:1.0"]["org.example:lib"],
        "1.2.3"
    );
    let entries = m.defaults.dependencies.entries();
    assert_eq!(entries[0], (DependencyScope::Api, "slf4j_api"));
    assert_eq!(entries[1].0, DependencyScope::TestRuntimeOnly);
}

#[test]
fn defaults_section_is_optional() {
    let m = RootManifest::parse_toml("[project]\ngroup = \"g\"\nversion = \"1\"\n").unwrap();
    assert!(m.defaults.plugins.is_empty());
    assert!(m.defaults.dependencies.is_empty());
    assert_eq!(m.defaults.clean.paths, vec![".project", "out", "bin"]);
    assert_eq!(m.defaults.settings().docs.output_dir, "build/javadoc");
}

#[test]
fn missing_project_is_an_error() {
    let err = RootManifest::parse_toml("[workspace]\nmembers = []\n").unwrap_err();
    assert!(matches!(err, TrellisError::Manifest { .. }));
}

#[test]
fn unknown_scope_is_rejected() {
    let err = MemberManifest::parse_toml("[dependencies]\ncompile = [\"guava\"]\n").unwrap_err();
    assert!(err.to_string().contains("compile"));
}

#[test]
fn parse_member_manifest() {
    let m = MemberManifest::parse_toml(
        r#"
[module]
name = "web"
plugins = ["spring_boot"]
compiler-args = ["-Xopt-in=kotlin.RequiresOptIn"]

[managed]
libraries = ["h2"]

[dependencies]
api = [":core", "guava"]
compile-only = ["org.projectlombok:lombok:1.18.8"]
"#,
    )
    .unwrap();
    assert_eq!(m.module.name.as_deref(), Some("web"));
    assert_eq!(m.module.compiler_args.len(), 1);
    assert_eq!(m.managed.libraries, vec!["h2"]);
    assert_eq!(m.dependencies.scope(DependencyScope::Api), [":core", "guava"]);
    assert_eq!(m.dependencies.compile_only.len(), 1);
}

#[test]
fn empty_member_manifest_is_valid() {
    let m = MemberManifest::parse_toml("").unwrap();
    assert!(m.module.name.is_none());
    assert!(m.dependencies.is_empty());
}

#[test]
fn from_path_interpolates_properties() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("trellis.properties"),
        "baseVersion=0.1.0\nsnapshotVersion=-SNAPSHOT\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("Trellis.toml"),
        "[project]\ngroup = \"g\"\nversion = \"${prop:baseVersion}${prop:snapshotVersion}\"\n",
    )
    .unwrap();
    let m = RootManifest::from_path(&dir.path().join("Trellis.toml")).unwrap();
    assert_eq!(m.project.version, "0.1.0-SNAPSHOT");
}

#[test]
fn from_path_undefined_property_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("Trellis.toml"),
        "[project]\ngroup = \"g\"\nversion = \"${prop:TRELLIS_TEST_UNDEFINED_PROP}\"\n",
    )
    .unwrap();
    let err = RootManifest::from_path(&dir.path().join("Trellis.toml")).unwrap_err();
    assert!(err.to_string().contains("TRELLIS_TEST_UNDEFINED_PROP"));
}
