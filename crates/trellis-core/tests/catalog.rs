use proptest::prelude::*;
use trellis_core::catalog::{Catalog, VersionRef};
use trellis_core::manifest::CatalogConfig;
use trellis_util::errors::TrellisError;

fn builtin() -> Catalog {
    Catalog::builtin().unwrap()
}

#[test]
fn builtin_resolves_slf4j_api() {
    let coord = builtin().resolve_coordinate("slf4j_api").unwrap();
    assert_eq!(coord.as_tuple(), ("org.slf4j", "slf4j-api", "1.7.26"));
}

#[test]
fn builtin_unknown_library_names_the_key() {
    let err = builtin().resolve_coordinate("does_not_exist").unwrap_err();
    match err {
        TrellisError::UnknownLibraryKey { key } => assert_eq!(key, "does_not_exist"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn builtin_unknown_version_names_the_key() {
    let err = builtin().resolve_version("nope").unwrap_err();
    assert!(matches!(err, TrellisError::UnknownVersionKey { ref key } if key == "nope"));
}

#[test]
fn builtin_literal_versions_resolve() {
    let catalog = builtin();
    let guava = catalog.resolve_coordinate("guava").unwrap();
    assert_eq!(guava.to_string(), "com.google.guava:guava:28.0-jre");
    assert_eq!(catalog.resolve_version("spring_boot").unwrap(), "2.1.8.RELEASE");
}

#[test]
fn every_version_ref_matches_the_version_table() {
    let catalog = builtin();
    for lib in catalog.libraries() {
        let coord = catalog.resolve_coordinate(&lib.name).unwrap();
        match &lib.version {
            VersionRef::Key(key) => {
                assert_eq!(coord.version, catalog.resolve_version(key).unwrap(), "{}", lib.name)
            }
            VersionRef::Literal(v) => assert_eq!(&coord.version, v, "{}", lib.name),
        }
    }
}

#[test]
fn builtin_plugins_and_bundles() {
    let catalog = builtin();
    let dokka = catalog.resolve_plugin("dokka").unwrap();
    assert_eq!(dokka.id, "org.jetbrains.dokka");
    assert_eq!(dokka.version.as_deref(), Some("0.9.18"));
    assert_eq!(catalog.resolve_plugin("jacoco").unwrap().version, None);
    assert!(catalog.bundle("testing").unwrap().contains(&"junit_jupiter".to_string()));
    assert!(matches!(
        catalog.resolve_plugin("gradle_magic"),
        Err(TrellisError::UnknownPluginKey { .. })
    ));
    assert!(matches!(
        catalog.bundle("nothing"),
        Err(TrellisError::UnknownBundleKey { .. })
    ));
}

#[test]
fn unresolved_version_ref_fails_at_build() {
    let mut builder = Catalog::builder();
    builder
        .library("foo", "org.foo", "foo", VersionRef::Key("missing".into()))
        .unwrap();
    let err = builder.build().unwrap_err();
    assert!(matches!(err, TrellisError::UnknownVersionKey { ref key } if key == "missing"));
}

#[test]
fn bundle_with_unknown_member_fails_at_build() {
    let mut builder = Catalog::builder();
    builder.bundle("b", vec!["ghost".into()]).unwrap();
    let err = builder.build().unwrap_err();
    assert!(matches!(err, TrellisError::UnknownLibraryKey { ref key } if key == "ghost"));
}

#[test]
fn duplicate_version_fails_fast() {
    let mut builder = Catalog::builder();
    builder.version("kotlin", "1.3.50").unwrap();
    let err = builder.version("kotlin", "1.3.41").unwrap_err();
    assert!(matches!(err, TrellisError::DuplicateKey { ref kind, .. } if kind == "version"));
}

#[test]
fn config_with_short_and_detailed_entries() {
    let config: CatalogConfig = toml::from_str(
        r#"
[versions]
jackson = "2.9.9"

[libraries]
jackson_core = { group = "com.fasterxml.jackson.core", artifact = "jackson-core", version.ref = "jackson" }
jackson_kotlin = { group = "com.fasterxml.jackson.module", artifact = "jackson-module-kotlin", version = "2.9.8" }
h2 = "com.h2database:h2:1.4.197"

[bundles]
json = ["jackson_core", "jackson-kotlin"]

[plugins]
spring_boot = { id = "org.springframework.boot", version = "2.1.8.RELEASE" }
base = "base"
"#,
    )
    .unwrap();
    let catalog = Catalog::from_config(&config, std::path::Path::new(".")).unwrap();
    assert_eq!(
        catalog.resolve_coordinate("jackson_core").unwrap().version,
        "2.9.9"
    );
    assert_eq!(
        catalog.resolve_coordinate("jackson_kotlin").unwrap().version,
        "2.9.8"
    );
    assert_eq!(catalog.resolve_coordinate("h2").unwrap().artifact, "h2");
    assert_eq!(catalog.bundle("json").unwrap().len(), 2);
    assert_eq!(catalog.resolve_plugin("base").unwrap().id, "base");
    assert_eq!(catalog.len(), 1 + 3 + 1 + 2);
}

#[test]
fn malformed_short_library_is_rejected() {
    let config: CatalogConfig = toml::from_str(
        r#"
[libraries]
broken = "org.foo:foo"
"#,
    )
    .unwrap();
    let err = Catalog::from_config(&config, std::path::Path::new(".")).unwrap_err();
    assert!(matches!(err, TrellisError::Manifest { .. }));
}

#[test]
fn included_files_merge_and_detect_duplicates() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("extra.toml"),
        "[versions]\nslf4j = \"1.7.26\"\n\n[libraries]\nslf4j_api = { group = \"org.slf4j\", artifact = \"slf4j-api\", version.ref = \"slf4j\" }\n",
    )
    .unwrap();

    let config: CatalogConfig = toml::from_str(
        r#"
include = ["extra.toml"]

[libraries]
guava = "com.google.guava:guava:28.0-jre"
"#,
    )
    .unwrap();
    let catalog = Catalog::from_config(&config, dir.path()).unwrap();
    assert_eq!(
        catalog.resolve_coordinate("slf4j-api").unwrap().to_string(),
        "org.slf4j:slf4j-api:1.7.26"
    );

    let clashing: CatalogConfig = toml::from_str(
        r#"
include = ["extra.toml"]

[versions]
slf4j = "1.7.25"
"#,
    )
    .unwrap();
    let err = Catalog::from_config(&clashing, dir.path()).unwrap_err();
    assert!(matches!(err, TrellisError::DuplicateKey { ref key, .. } if key == "slf4j"));
}

#[test]
fn missing_include_is_a_manifest_error() {
    let config = CatalogConfig {
        include: vec!["nope.toml".into()],
        ..Default::default()
    };
    let dir = tempfile::TempDir::new().unwrap();
    assert!(matches!(
        Catalog::from_config(&config, dir.path()),
        Err(TrellisError::Manifest { .. })
    ));
}

proptest! {
    #[test]
    fn unregistered_names_fail_with_the_name(name in "zz_[a-z0-9_]{1,16}") {
        let catalog = builtin();
        match catalog.resolve_coordinate(&name) {
            Err(TrellisError::UnknownLibraryKey { key }) => prop_assert_eq!(key, name.clone()),
            other => prop_assert!(false, "unexpected: {:?}", other.map(|c| c.to_string())),
        }
        let is_unknown_version = matches!(
            catalog.resolve_version(&name),
            Err(TrellisError::UnknownVersionKey { .. })
        );
        prop_assert!(is_unknown_version);
    }
}
