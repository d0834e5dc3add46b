//! CLI argument definitions for Trellis.
//!
//! Uses `clap` derive macros to define the full command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "trellis",
    version,
    about = "Declarative build configuration for multi-module JVM workspaces",
    long_about = "Trellis propagates a shared version catalog, platform defaults and managed \
                  dependency versions to every module of a workspace, and writes a \
                  deterministic configuration per module."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a Trellis workspace in the current directory
    Init {
        /// Maven group of the workspace modules
        #[arg(short, long, default_value = "com.example")]
        group: String,
    },

    /// Add a member module to the workspace
    New {
        /// Module directory, relative to the workspace root
        path: String,
    },

    /// Add a dependency reference to a module
    Add {
        /// Module to edit
        module: String,
        /// Catalog key, bundle:<name>, :<module> or group:artifact[:version]
        dep: String,
        /// Dependency scope
        #[arg(short, long, default_value = "implementation")]
        scope: String,
        /// Enforce the version through [managed] libraries instead
        #[arg(long)]
        managed: bool,
    },

    /// Configure every module without writing outputs
    Check,

    /// Configure every module and write Trellis.lock and build/trellis exports
    Configure {
        /// Number of modules configured concurrently
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Print a module's finalized configuration
    Show {
        /// Module name
        module: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Query the version catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
        /// Query the built-in catalog instead of the workspace catalog
        #[arg(long, global = true)]
        builtin: bool,
    },

    /// Remove generated files from every module
    Clean,
}

#[derive(Subcommand, Debug)]
pub enum CatalogAction {
    /// Print the version behind a symbolic version name
    Version { name: String },
    /// Print the coordinate of a library
    Library { name: String },
    /// List every catalog entry
    List,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum Format {
    Json,
    Toml,
}

pub fn parse() -> Cli {
    Cli::parse()
}
