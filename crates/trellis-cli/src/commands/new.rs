use miette::Result;

use trellis_core::workspace::Workspace;
use trellis_ops::ops_new;

pub fn exec(path: &str) -> Result<()> {
    let cwd = super::current_dir()?;
    let ws = Workspace::discover(&cwd)?;
    let created = ops_new::new_module(&ws.root_dir, path)?;
    println!(
        "Created module '{}' at {} ({} files)",
        created.name,
        created.dir,
        created.written.len()
    );
    Ok(())
}
