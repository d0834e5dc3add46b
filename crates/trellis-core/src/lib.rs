//! Core data types for Trellis.
//!
//! This crate defines the fundamental types of a Trellis workspace: Maven
//! coordinates, dependency scopes, the version catalog, root and member
//! manifests, shared tool settings, finalized module configurations,
//! lockfiles, global configuration, and local properties.
//!
//! This crate is intentionally free of async code and network I/O.

/// Name of the manifest file at the workspace root and in every member.
pub const MANIFEST_FILE: &str = "Trellis.toml";

/// Name of the lockfile written next to the root manifest.
pub const LOCKFILE: &str = "Trellis.lock";

/// Name of the properties file read next to the root manifest.
pub const PROPERTIES_FILE: &str = "trellis.properties";

pub mod catalog;
pub mod config;
pub mod coordinate;
pub mod defaults;
pub mod dependency;
pub mod lockfile;
pub mod manifest;
pub mod module;
pub mod plugin;
pub mod properties;
pub mod settings;
pub mod template;
pub mod workspace;
