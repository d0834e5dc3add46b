use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::coordinate::PartialCoordinate;

/// Visibility scope of a declared dependency.
///
/// The ordering is the order in which scopes are listed in manifests and
/// finalized configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyScope {
    /// Compile dependency exported to consumers of the module.
    Api,
    /// Compile dependency internal to the module.
    Implementation,
    /// Available at compile time only, never packaged.
    CompileOnly,
    /// Needed at runtime only.
    RuntimeOnly,
    /// Compile and run the module's tests.
    TestImplementation,
    /// Run the module's tests.
    TestRuntimeOnly,
}

impl DependencyScope {
    pub const ALL: [DependencyScope; 6] = [
        DependencyScope::Api,
        DependencyScope::Implementation,
        DependencyScope::CompileOnly,
        DependencyScope::RuntimeOnly,
        DependencyScope::TestImplementation,
        DependencyScope::TestRuntimeOnly,
    ];

    /// The kebab-case name used in manifests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Implementation => "implementation",
            Self::CompileOnly => "compile-only",
            Self::RuntimeOnly => "runtime-only",
            Self::TestImplementation => "test-implementation",
            Self::TestRuntimeOnly => "test-runtime-only",
        }
    }

    /// Whether the dependency is visible to consumers of the module.
    pub fn is_exported(&self) -> bool {
        matches!(self, Self::Api)
    }

    /// Whether the dependency only exists for tests.
    pub fn is_test(&self) -> bool {
        matches!(self, Self::TestImplementation | Self::TestRuntimeOnly)
    }
}

impl Default for DependencyScope {
    fn default() -> Self {
        Self::Implementation
    }
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
                format!("unknown scope '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// A reference to something that can be declared as a dependency.
///
/// Parsed from manifest strings:
///
/// - `:core` is another workspace module,
/// - `bundle:testing` is every library of a catalog bundle,
/// - `group:artifact[:version]` is a literal coordinate,
/// - anything else is a catalog library key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencyRef {
    Library(String),
    Bundle(String),
    Module(String),
    Coordinate(PartialCoordinate),
}

impl DependencyRef {
    /// Parse a manifest dependency string. Returns `None` for malformed coordinates.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Some(module) = s.strip_prefix(':') {
            return (!module.is_empty() && !module.contains(':'))
                .then(|| Self::Module(module.to_string()));
        }
        if let Some(bundle) = s.strip_prefix("bundle:") {
            return (!bundle.is_empty() && !bundle.contains(':'))
                .then(|| Self::Bundle(bundle.to_string()));
        }
        if s.contains(':') {
            return PartialCoordinate::parse(s).map(Self::Coordinate);
        }
        Some(Self::Library(s.to_string()))
    }
}

impl fmt::Display for DependencyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library(name) => f.write_str(name),
            Self::Bundle(name) => write!(f, "bundle:{name}"),
            Self::Module(name) => write!(f, ":{name}"),
            Self::Coordinate(coord) => write!(f, "{coord}"),
        }
    }
}
