use miette::Result;

use trellis_ops::ops_catalog::{self, CatalogSource};

use crate::cli::CatalogAction;

pub fn exec(action: CatalogAction, builtin: bool) -> Result<()> {
    let cwd = super::current_dir()?;
    let source = if builtin {
        CatalogSource::Builtin
    } else {
        CatalogSource::Workspace(&cwd)
    };

    match action {
        CatalogAction::Version { name } => println!("{}", ops_catalog::version(source, &name)?),
        CatalogAction::Library { name } => println!("{}", ops_catalog::library(source, &name)?),
        CatalogAction::List => {
            for line in ops_catalog::list(source)? {
                println!("{line}");
            }
        }
    }
    Ok(())
}
