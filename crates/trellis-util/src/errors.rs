use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all Trellis operations.
///
/// Every configuration error is fatal: a workspace either configures every
/// module or aborts before anything is written.
#[derive(Debug, Error, Diagnostic)]
pub enum TrellisError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed manifest (e.g. Trellis.toml).
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check your Trellis.toml for syntax errors"))]
    Manifest { message: String },

    /// A symbolic version name is not registered in the catalog.
    #[error("Unknown version key '{key}'")]
    #[diagnostic(help("Add it under [catalog.versions]"))]
    UnknownVersionKey { key: String },

    /// A symbolic library name is not registered in the catalog.
    #[error("Unknown library key '{key}'")]
    #[diagnostic(help("Add it under [catalog.libraries]"))]
    UnknownLibraryKey { key: String },

    /// A plugin reference is not registered in the catalog.
    #[error("Unknown plugin key '{key}'")]
    #[diagnostic(help("Add it under [catalog.plugins]"))]
    UnknownPluginKey { key: String },

    /// A bundle reference is not registered in the catalog.
    #[error("Unknown bundle key '{key}'")]
    #[diagnostic(help("Add it under [catalog.bundles]"))]
    UnknownBundleKey { key: String },

    /// The same symbolic name was registered twice.
    #[error("Duplicate {kind} key '{key}'")]
    DuplicateKey { kind: String, key: String },

    /// A module operation was attempted in the wrong configuration stage.
    #[error("Cannot {operation} on module '{module}' in stage {stage}")]
    #[diagnostic(help("Stages run in order: defaults, versions, dependencies, finalize"))]
    OutOfOrderConfiguration {
        module: String,
        operation: String,
        stage: String,
    },

    /// Version constraints could not be satisfied or a coordinate is unresolvable.
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },

    /// A bill of materials could not be located or read.
    #[error("BOM error: {message}")]
    Bom { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

impl TrellisError {
    /// Shorthand for a [`TrellisError::Resolution`] error.
    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution {
            message: message.into(),
        }
    }

    /// Shorthand for a [`TrellisError::Manifest`] error.
    pub fn manifest(message: impl Into<String>) -> Self {
        Self::Manifest {
            message: message.into(),
        }
    }
}

/// Convenience alias for `miette::Result<T>`.
pub type TrellisResult<T> = miette::Result<T>;
