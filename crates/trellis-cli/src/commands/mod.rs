//! Command dispatch and handler modules.

mod add;
mod catalog;
mod check;
mod clean;
mod configure;
mod init;
mod new;
mod show;

use std::path::PathBuf;

use miette::Result;
use trellis_util::errors::TrellisError;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Init { group } => init::exec(&group),
        Command::New { path } => new::exec(&path),
        Command::Add {
            module,
            dep,
            scope,
            managed,
        } => add::exec(&module, &dep, &scope, managed),
        Command::Check => check::exec(cli.verbose),
        Command::Configure { jobs } => configure::exec(jobs, cli.verbose).await,
        Command::Show { module, format } => show::exec(&module, format),
        Command::Catalog { action, builtin } => catalog::exec(action, builtin),
        Command::Clean => clean::exec(cli.verbose),
    }
}

fn current_dir() -> Result<PathBuf> {
    Ok(std::env::current_dir().map_err(TrellisError::Io)?)
}
