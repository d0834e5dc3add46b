use std::fs;
use std::path::Path;

use tempfile::TempDir;
use trellis_core::catalog::Catalog;
use trellis_core::config::{BomConfig, ConfigureConfig, GlobalConfig};
use trellis_core::dependency::DependencyScope;
use trellis_core::lockfile::Lockfile;
use trellis_core::manifest::RootManifest;
use trellis_core::module::ModuleConfig;
use trellis_ops::ops_add::{add_dependency, AddOptions};
use trellis_ops::ops_catalog::{self, CatalogSource};
use trellis_ops::ops_check::check;
use trellis_ops::ops_clean::clean;
use trellis_ops::ops_configure::{configure, ConfigureOptions};
use trellis_ops::ops_new::new_module;
use trellis_ops::ops_show::{show, ShowFormat};

const ROOT: &str = r#"# Workspace root
[project]
group = "cc.example"
version = "${prop:baseVersion}"

[workspace]
# modules are added by `trellis new`
members = []

[catalog]
include = ["catalog.toml"]

[catalog.libraries]
platform = "org.example:platform:1.0"

[defaults]
plugins = ["java_library", "kotlin_jvm"]

[defaults.managed]
boms = ["platform"]

[defaults.dependencies]
implementation = ["kotlin_stdlib_jdk8"]
test-implementation = ["junit_jupiter"]

[boms."org.example:platform:1.0"]
"com.h2database:h2" = "1.4.199"
"#;

fn global(tmp: &TempDir, jobs: u32) -> GlobalConfig {
    GlobalConfig {
        configure: ConfigureConfig { jobs },
        boms: BomConfig {
            local_repository: tmp.path().join("m2").display().to_string(),
        },
    }
}

/// A workspace with `core` and `web`, where `web` depends on `core`.
fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::write(root.join("Trellis.toml"), ROOT).unwrap();
    fs::write(root.join("trellis.properties"), "baseVersion=1.2.0\n").unwrap();
    fs::write(root.join("catalog.toml"), Catalog::builtin_source()).unwrap();
    new_module(root, "core").unwrap();
    new_module(root, "apps/web").unwrap();
    add(root, "web", ":core", DependencyScope::Api, false);
    add(root, "web", "com.h2database:h2", DependencyScope::RuntimeOnly, false);
    tmp
}

fn add(root: &Path, module: &str, reference: &str, scope: DependencyScope, managed: bool) -> bool {
    add_dependency(
        root,
        &AddOptions {
            module: module.to_string(),
            reference: reference.to_string(),
            scope,
            managed,
        },
    )
    .unwrap()
}

#[test]
fn new_registers_members_and_keeps_formatting() {
    let tmp = workspace();
    let content = fs::read_to_string(tmp.path().join("Trellis.toml")).unwrap();
    assert!(content.starts_with("# Workspace root\n"));
    assert!(content.contains("# modules are added by `trellis new`"));

    let manifest = RootManifest::from_path(&tmp.path().join("Trellis.toml")).unwrap();
    assert_eq!(manifest.workspace.members, vec!["core", "apps/web"]);
    assert!(tmp.path().join("apps/web/Trellis.toml").is_file());
    assert!(tmp.path().join("apps/web/src/main/kotlin").is_dir());
}

#[test]
fn new_rejects_existing_and_escaping_paths() {
    let tmp = workspace();
    assert!(new_module(tmp.path(), "core").is_err());
    assert!(new_module(tmp.path(), "other/core").is_err());
    assert!(new_module(tmp.path(), "../outside").is_err());
    assert!(new_module(tmp.path(), "/abs").is_err());
}

#[test]
fn add_appends_once() {
    let tmp = workspace();
    assert!(add(tmp.path(), "core", "guava", DependencyScope::Api, false));
    assert!(!add(tmp.path(), "core", "guava", DependencyScope::Api, false));
    assert!(add(tmp.path(), "core", "bundle:kotlin", DependencyScope::Implementation, false));
    assert!(add(tmp.path(), "core", "junit_jupiter", DependencyScope::Api, true));

    let content = fs::read_to_string(tmp.path().join("core/Trellis.toml")).unwrap();
    assert!(content.contains("api = [\"guava\"]"));
    assert!(content.contains("\"bundle:kotlin\""));
    assert!(content.contains("libraries = [\"junit_jupiter\"]"));
}

#[test]
fn add_checks_references() {
    let tmp = workspace();
    let opts = |module: &str, reference: &str, managed: bool| AddOptions {
        module: module.to_string(),
        reference: reference.to_string(),
        scope: DependencyScope::Api,
        managed,
    };
    let err = add_dependency(tmp.path(), &opts("core", "gauva", false)).unwrap_err();
    assert!(err.to_string().contains("gauva"));
    assert!(add_dependency(tmp.path(), &opts("core", "bundle:nope", false)).is_err());
    assert!(add_dependency(tmp.path(), &opts("core", ":core", false)).is_err());
    assert!(add_dependency(tmp.path(), &opts("core", ":ghost", false)).is_err());
    assert!(add_dependency(tmp.path(), &opts("core", "x:y", true)).is_err());
    assert!(add_dependency(tmp.path(), &opts("ghost", "guava", false)).is_err());
}

#[test]
fn check_configures_without_writing() {
    let tmp = workspace();
    let modules = check(&tmp.path().join("apps/web"), &global(&tmp, 1), false).unwrap();
    let names: Vec<&str> = modules.iter().map(|m| m.config.name.as_str()).collect();
    assert_eq!(names, vec!["core", "web"]);
    assert!(!tmp.path().join("Trellis.lock").exists());
    assert!(!tmp.path().join("build").exists());
}

#[test]
fn check_reports_unknown_library() {
    let tmp = workspace();
    fs::write(
        tmp.path().join("core/Trellis.toml"),
        "[dependencies]\napi = [\"not_in_catalog\"]\n",
    )
    .unwrap();
    let err = check(tmp.path(), &global(&tmp, 1), false).unwrap_err();
    assert!(err.to_string().contains("not_in_catalog"));
}

#[tokio::test]
async fn configure_writes_lockfile_and_exports() {
    let tmp = workspace();
    let outcome = configure(tmp.path(), &global(&tmp, 4), &ConfigureOptions::default())
        .await
        .unwrap();
    assert!(outcome.lockfile_updated);
    assert_eq!(outcome.archives.len(), 6);
    assert_eq!(outcome.archives[0], "core-1.2.0.jar");

    let lock = Lockfile::from_path(&outcome.lockfile).unwrap();
    let web = lock.find("web").unwrap();
    assert_eq!(web.group, "cc.example");
    assert!(web
        .dependency
        .iter()
        .any(|t| t.artifact == "h2" && t.version == "1.4.199" && t.scope == DependencyScope::RuntimeOnly));
    assert!(web
        .dependency
        .iter()
        .any(|t| t.artifact == "core" && t.version == "1.2.0"));

    let json = fs::read_to_string(tmp.path().join("build/trellis/web.json")).unwrap();
    let config: ModuleConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config.fingerprint().unwrap(), web.fingerprint);
}

#[tokio::test]
async fn configure_is_stable_across_runs_and_job_counts() {
    let tmp = workspace();
    let first = configure(tmp.path(), &global(&tmp, 4), &ConfigureOptions::default())
        .await
        .unwrap();
    let lock = fs::read_to_string(&first.lockfile).unwrap();

    let opts = ConfigureOptions {
        jobs: Some(1),
        verbose: true,
    };
    let second = configure(tmp.path(), &global(&tmp, 4), &opts).await.unwrap();
    assert!(!second.lockfile_updated);
    assert_eq!(fs::read_to_string(&second.lockfile).unwrap(), lock);
}

#[test]
fn show_renders_json_and_toml() {
    let tmp = workspace();
    let json = show(tmp.path(), &global(&tmp, 1), "web", ShowFormat::Json).unwrap();
    assert!(json.contains("\"name\": \"web\""));
    assert!(json.contains("1.4.199"));

    let toml = show(tmp.path(), &global(&tmp, 1), "core", ShowFormat::Toml).unwrap();
    assert!(toml.contains("name = \"core\""));

    assert!(show(tmp.path(), &global(&tmp, 1), "ghost", ShowFormat::Json).is_err());
    assert_eq!("toml".parse::<ShowFormat>().unwrap(), ShowFormat::Toml);
    assert!("yaml".parse::<ShowFormat>().is_err());
}

#[test]
fn catalog_lookups() {
    let tmp = workspace();
    let source = CatalogSource::Workspace(tmp.path());
    assert_eq!(ops_catalog::version(source, "kotlin").unwrap(), "1.3.50");
    assert_eq!(
        ops_catalog::library(source, "platform").unwrap().to_string(),
        "org.example:platform:1.0"
    );
    assert!(ops_catalog::library(CatalogSource::Builtin, "platform").is_err());
    assert!(ops_catalog::version(CatalogSource::Builtin, "no_such_version").is_err());

    let lines = ops_catalog::list(CatalogSource::Builtin).unwrap();
    assert!(lines.iter().any(|l| l == "library  guava = com.google.guava:guava:28.0-jre"));
    assert!(lines.iter().any(|l| l.starts_with("bundle   kotlin = [")));
}

#[tokio::test]
async fn clean_removes_generated_paths() {
    let tmp = workspace();
    configure(tmp.path(), &global(&tmp, 1), &ConfigureOptions::default())
        .await
        .unwrap();
    fs::create_dir_all(tmp.path().join("core/out/classes")).unwrap();
    fs::create_dir_all(tmp.path().join("apps/web/build/libs")).unwrap();
    fs::write(tmp.path().join("apps/web/.project"), "").unwrap();

    let result = clean(&tmp.path().join("core")).unwrap();
    assert_eq!(result.removed.len(), 4);
    assert!(result.failed.is_empty());
    assert!(!tmp.path().join("build").exists());
    assert!(!tmp.path().join("core/out").exists());
    assert!(tmp.path().join("core/src/main/kotlin").is_dir());
    assert!(tmp.path().join("Trellis.lock").is_file());

    assert!(clean(tmp.path()).unwrap().is_empty());
}
