//! Tool configuration blocks shared by every module.
//!
//! Each block is consumed by an external tool (compiler, test runner, docs
//! generator, linter, coverage reporter, packager). Defaults reproduce the
//! conventional JVM setup: Java 8 target, JUnit platform, HTML docs under
//! `build/javadoc`, detekt with HTML reports and jacoco with HTML and XML.

use serde::{Deserialize, Serialize};

/// Compiler target and flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompilerSettings {
    #[serde(default = "default_jvm_target")]
    pub source_compatibility: String,
    #[serde(default = "default_jvm_target")]
    pub jvm_target: String,
    #[serde(default = "default_compiler_args")]
    pub args: Vec<String>,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            source_compatibility: default_jvm_target(),
            jvm_target: default_jvm_target(),
            args: default_compiler_args(),
        }
    }
}

fn default_jvm_target() -> String {
    "1.8".to_string()
}

fn default_compiler_args() -> Vec<String> {
    vec!["-Xjsr305=strict".to_string(), "-Xjvm-default=enable".to_string()]
}

/// Test runner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestSettings {
    #[serde(default = "default_test_platform")]
    pub platform: String,
    #[serde(default = "default_log_events")]
    pub log_events: Vec<String>,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            platform: default_test_platform(),
            log_events: default_log_events(),
        }
    }
}

fn default_test_platform() -> String {
    "junit-platform".to_string()
}

fn default_log_events() -> Vec<String> {
    vec!["failed".to_string()]
}

/// API documentation output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DocsSettings {
    #[serde(default = "default_docs_format")]
    pub format: String,
    #[serde(default = "default_docs_output")]
    pub output_dir: String,
}

impl Default for DocsSettings {
    fn default() -> Self {
        Self {
            format: default_docs_format(),
            output_dir: default_docs_output(),
        }
    }
}

fn default_docs_format() -> String {
    "html".to_string()
}

fn default_docs_output() -> String {
    "build/javadoc".to_string()
}

/// Classifiers of the extra archives packaged next to the main jar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArtifactSettings {
    #[serde(default = "default_sources_classifier")]
    pub sources_classifier: String,
    #[serde(default = "default_docs_classifier")]
    pub docs_classifier: String,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            sources_classifier: default_sources_classifier(),
            docs_classifier: default_docs_classifier(),
        }
    }
}

fn default_sources_classifier() -> String {
    "sources".to_string()
}

fn default_docs_classifier() -> String {
    "javadoc".to_string()
}

/// Static analysis settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LintSettings {
    #[serde(default = "default_lint_description")]
    pub description: String,
    #[serde(default = "default_lint_input")]
    pub input: Vec<String>,
    /// Ruleset path, relative to the workspace root.
    #[serde(default = "default_lint_config")]
    pub config: String,
    /// Path pattern excluded from analysis.
    #[serde(default = "default_lint_filters")]
    pub filters: String,
    #[serde(default)]
    pub reports: LintReports,
}

impl Default for LintSettings {
    fn default() -> Self {
        Self {
            description: default_lint_description(),
            input: default_lint_input(),
            config: default_lint_config(),
            filters: default_lint_filters(),
            reports: LintReports::default(),
        }
    }
}

fn default_lint_description() -> String {
    "Runs a failfast detekt build.".to_string()
}

fn default_lint_input() -> Vec<String> {
    vec!["src/main/kotlin".to_string()]
}

fn default_lint_config() -> String {
    "checkstyle/detekt.yml".to_string()
}

fn default_lint_filters() -> String {
    ".*/build/.*".to_string()
}

/// Which lint report formats are produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintReports {
    #[serde(default)]
    pub xml: bool,
    #[serde(default = "enabled")]
    pub html: bool,
}

impl Default for LintReports {
    fn default() -> Self {
        Self {
            xml: false,
            html: true,
        }
    }
}

/// Which coverage report formats are produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSettings {
    #[serde(default = "enabled")]
    pub html: bool,
    #[serde(default = "enabled")]
    pub xml: bool,
    #[serde(default)]
    pub csv: bool,
}

impl Default for CoverageSettings {
    fn default() -> Self {
        Self {
            html: true,
            xml: true,
            csv: false,
        }
    }
}

fn enabled() -> bool {
    true
}

/// Generated paths removed from a module directory by `trellis clean`.
///
/// Entries are relative to the module directory and may be globs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanRule {
    #[serde(default = "default_clean_paths")]
    pub paths: Vec<String>,
}

impl Default for CleanRule {
    fn default() -> Self {
        Self {
            paths: default_clean_paths(),
        }
    }
}

fn default_clean_paths() -> Vec<String> {
    vec![".project".to_string(), "out".to_string(), "bin".to_string()]
}

/// Every tool block together, as applied to one module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default)]
    pub compiler: CompilerSettings,
    #[serde(default)]
    pub test: TestSettings,
    #[serde(default)]
    pub docs: DocsSettings,
    #[serde(default)]
    pub artifacts: ArtifactSettings,
    #[serde(default)]
    pub lint: LintSettings,
    #[serde(default)]
    pub coverage: CoverageSettings,
    #[serde(default)]
    pub clean: CleanRule,
}
