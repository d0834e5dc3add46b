use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use trellis_core::dependency::DependencyScope;
use trellis_core::workspace::Workspace;
use trellis_engine::pipeline::{configure_parallel, Propagation};
use trellis_util::errors::TrellisError;

const ROOT: &str = r#"
[project]
group = "cc.example"
version = "0.1.0-SNAPSHOT"
repositories = ["https://repo.maven.apache.org/maven2"]

[workspace]
members = ["core", "web", "batch"]

[catalog.versions]
slf4j = "1.7.26"
junit_jupiter = "5.5.1"

[catalog.libraries]
slf4j_api = { group = "org.slf4j", artifact = "slf4j-api", version.ref = "slf4j" }
guava = "com.google.guava:guava:28.0-jre"
junit_jupiter = { group = "org.junit.jupiter", artifact = "junit-jupiter", version.ref = "junit_jupiter" }
platform = "org.example:platform:1.0"

[catalog.bundles]
testing = ["junit_jupiter"]

[catalog.plugins]
java_library = "java-library"
jacoco = "jacoco"
spring_boot = { id = "org.springframework.boot", version = "2.1.8.RELEASE" }

[defaults]
plugins = ["java_library", "jacoco"]

[defaults.managed]
boms = ["platform"]
libraries = ["junit_jupiter"]

[defaults.dependencies]
api = ["slf4j_api"]
test-implementation = ["bundle:testing"]

[boms."org.example:platform:1.0"]
"org.junit.jupiter:junit-jupiter" = "5.3.2"
"com.h2database:h2" = "1.4.199"
"#;

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn workspace(root: &Path) -> Workspace {
    write(root, "Trellis.toml", ROOT);
    write(
        root,
        "core/Trellis.toml",
        "[dependencies]\nimplementation = [\"guava\"]\n",
    );
    write(
        root,
        "web/Trellis.toml",
        concat!(
            "[module]\nplugins = [\"spring_boot\"]\ncompiler-args = [\"-Xopt-in=kotlin.RequiresOptIn\"]\n\n",
            "[dependencies]\napi = [\":core\"]\nruntime-only = [\"com.h2database:h2\"]\n",
        ),
    );
    write(
        root,
        "batch/Trellis.toml",
        "[dependencies]\nimplementation = [\":web\", \"guava\"]\n",
    );
    Workspace::load(root).unwrap()
}

fn propagation(ws: &Workspace, tmp: &TempDir) -> Propagation {
    Propagation::for_workspace(ws, &tmp.path().join("m2")).unwrap()
}

#[test]
fn configures_every_module_in_dependency_order() {
    let tmp = TempDir::new().unwrap();
    let ws = workspace(tmp.path());
    let modules = propagation(&ws, &tmp).configure_all(&ws.members).unwrap();

    let names: Vec<&str> = modules.iter().map(|m| m.config.name.as_str()).collect();
    assert_eq!(names, vec!["core", "web", "batch"]);

    let web = &modules[1].config;
    assert_eq!(web.coordinate.to_string(), "cc.example:web:0.1.0-SNAPSHOT");
    assert_eq!(web.plugins.len(), 3);
    assert!(web
        .settings
        .compiler
        .args
        .contains(&"-Xopt-in=kotlin.RequiresOptIn".to_string()));
    assert_eq!(web.repositories, vec!["https://repo.maven.apache.org/maven2"]);

    let core_dep = web.dependencies_in(DependencyScope::Api).find(|d| d.reference == ":core");
    assert_eq!(
        core_dep.unwrap().coordinate.to_string(),
        "cc.example:core:0.1.0-SNAPSHOT"
    );
    let h2 = web.dependencies_in(DependencyScope::RuntimeOnly).next().unwrap();
    assert_eq!(h2.coordinate.version, "1.4.199");
}

#[test]
fn defaults_reach_every_module() {
    let tmp = TempDir::new().unwrap();
    let ws = workspace(tmp.path());
    let modules = propagation(&ws, &tmp).configure_all(&ws.members).unwrap();

    for m in &modules {
        let slf4j = m.config.dependencies_in(DependencyScope::Api).find(|d| d.reference == "slf4j_api");
        assert_eq!(slf4j.unwrap().coordinate.version, "1.7.26", "{}", m.config.name);
        let junit = m
            .config
            .dependencies_in(DependencyScope::TestImplementation)
            .next()
            .unwrap();
        // The catalog constraint wins over the platform BOM.
        assert_eq!(junit.coordinate.version, "5.5.1");
        assert_eq!(m.report.len(), 1);
        assert_eq!(m.config.boms.len(), 1);
    }
}

#[test]
fn shared_library_resolves_identically() {
    let tmp = TempDir::new().unwrap();
    let ws = workspace(tmp.path());
    let modules = propagation(&ws, &tmp).configure_all(&ws.members).unwrap();
    let guava: Vec<_> = modules
        .iter()
        .flat_map(|m| m.config.resolution_tuples())
        .filter(|t| t.artifact == "guava")
        .collect();
    assert_eq!(guava.len(), 2);
    assert_eq!(guava[0], guava[1]);
}

#[test]
fn unknown_library_names_the_key() {
    let tmp = TempDir::new().unwrap();
    let ws = workspace(tmp.path());
    write(tmp.path(), "core/Trellis.toml", "[dependencies]\napi = [\"gauva\"]\n");
    let ws = Workspace::load(&ws.root_dir).unwrap();
    let err = propagation(&ws, &tmp).configure_all(&ws.members).unwrap_err();
    assert!(matches!(err, TrellisError::UnknownLibraryKey { ref key } if key == "gauva"));
}

#[test]
fn missing_bom_is_a_resolution_error() {
    let tmp = TempDir::new().unwrap();
    let ws = workspace(tmp.path());
    write(
        tmp.path(),
        "core/Trellis.toml",
        "[managed]\nboms = [\"org.example:other-platform:2.0\"]\n",
    );
    let ws = Workspace::load(&ws.root_dir).unwrap();
    let err = propagation(&ws, &tmp).configure_all(&ws.members).unwrap_err();
    assert!(matches!(err, TrellisError::Resolution { .. }));
    assert!(err.to_string().contains("other-platform"));
}

#[test]
fn module_cycle_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let ws = workspace(tmp.path());
    write(tmp.path(), "core/Trellis.toml", "[dependencies]\napi = [\":batch\"]\n");
    let ws = Workspace::load(&ws.root_dir).unwrap();
    let err = propagation(&ws, &tmp).configure_all(&ws.members).unwrap_err();
    assert!(err.to_string().contains("cycle"));
}

#[tokio::test]
async fn parallel_configuration_matches_sequential() {
    let tmp = TempDir::new().unwrap();
    let ws = workspace(tmp.path());
    let sequential = propagation(&ws, &tmp).configure_all(&ws.members).unwrap();
    let parallel = configure_parallel(
        Arc::new(propagation(&ws, &tmp)),
        ws.members.clone(),
        4,
    )
    .await
    .unwrap();

    let a: Vec<_> = sequential.iter().map(|m| &m.config).collect();
    let b: Vec<_> = parallel.iter().map(|m| &m.config).collect();
    assert_eq!(a, b);
}

#[tokio::test]
async fn parallel_configuration_stops_on_first_error() {
    let tmp = TempDir::new().unwrap();
    let ws = workspace(tmp.path());
    write(tmp.path(), "web/Trellis.toml", "[dependencies]\napi = [\"x:y\"]\n");
    let ws = Workspace::load(&ws.root_dir).unwrap();
    let result = configure_parallel(Arc::new(propagation(&ws, &tmp)), ws.members.clone(), 1).await;
    assert!(matches!(result, Err(TrellisError::Resolution { .. })));
}
