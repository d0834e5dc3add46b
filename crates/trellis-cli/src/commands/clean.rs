use miette::Result;

use trellis_ops::ops_clean;

pub fn exec(verbose: bool) -> Result<()> {
    let cwd = super::current_dir()?;
    let result = ops_clean::clean(&cwd)?;

    if result.is_empty() {
        println!("Nothing to clean");
        return Ok(());
    }
    if verbose {
        for path in &result.removed {
            println!("Removed {}", path.display());
        }
    }
    println!("Cleaned {} paths", result.removed.len());
    if !result.failed.is_empty() {
        println!("{} paths could not be removed", result.failed.len());
    }
    Ok(())
}
