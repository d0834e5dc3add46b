use std::fmt;

/// Configuration stage of a module. Stages only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModuleStage {
    Unconfigured,
    DefaultsApplied,
    VersionsImported,
    DependenciesDeclared,
    Finalized,
}

impl ModuleStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::DefaultsApplied => "defaults-applied",
            Self::VersionsImported => "versions-imported",
            Self::DependenciesDeclared => "dependencies-declared",
            Self::Finalized => "finalized",
        }
    }

    /// Whether managed versions may still be added.
    pub fn accepts_managed_versions(&self) -> bool {
        matches!(self, Self::DefaultsApplied | Self::VersionsImported)
    }

    /// Whether dependencies may be declared.
    pub fn accepts_dependencies(&self) -> bool {
        matches!(
            self,
            Self::DefaultsApplied | Self::VersionsImported | Self::DependenciesDeclared
        )
    }
}

impl fmt::Display for ModuleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
