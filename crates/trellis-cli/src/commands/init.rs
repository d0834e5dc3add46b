use miette::Result;

use trellis_ops::ops_init;
use trellis_util::progress;

pub fn exec(group: &str) -> Result<()> {
    let cwd = super::current_dir()?;
    let written = ops_init::init(&cwd, group)?;
    if written.is_empty() {
        println!("Trellis workspace already initialized in {}", cwd.display());
        return Ok(());
    }
    for file in &written {
        progress::status("Created", file);
    }
    println!("Initialized Trellis workspace in {}", cwd.display());
    Ok(())
}
