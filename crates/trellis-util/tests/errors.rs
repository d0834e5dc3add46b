use trellis_util::errors::TrellisError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = TrellisError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_manifest_error_display() {
    let err = TrellisError::manifest("bad syntax");
    assert_eq!(err.to_string(), "Manifest error: bad syntax");
}

#[test]
fn test_unknown_library_key_names_the_key() {
    let err = TrellisError::UnknownLibraryKey {
        key: "does_not_exist".to_string(),
    };
    assert_eq!(err.to_string(), "Unknown library key 'does_not_exist'");
}

#[test]
fn test_unknown_version_key_names_the_key() {
    let err = TrellisError::UnknownVersionKey {
        key: "kotlin".to_string(),
    };
    assert_eq!(err.to_string(), "Unknown version key 'kotlin'");
}

#[test]
fn test_duplicate_key_display() {
    let err = TrellisError::DuplicateKey {
        kind: "library".to_string(),
        key: "guava".to_string(),
    };
    assert_eq!(err.to_string(), "Duplicate library key 'guava'");
}

#[test]
fn test_out_of_order_display() {
    let err = TrellisError::OutOfOrderConfiguration {
        module: "core".to_string(),
        operation: "declare dependency".to_string(),
        stage: "Unconfigured".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Cannot declare dependency on module 'core' in stage Unconfigured"
    );
}

#[test]
fn test_resolution_error_display() {
    let err = TrellisError::resolution("conflict");
    assert_eq!(err.to_string(), "Dependency resolution failed: conflict");
}

#[test]
fn test_generic_error_display() {
    let err = TrellisError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn test_converts_into_miette_report() {
    let report: miette::Report = TrellisError::resolution("x").into();
    assert!(report.to_string().contains("Dependency resolution failed"));
}
