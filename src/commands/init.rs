use anyhow::{bail, Result};
use tracing::info;

use super::workspace_root;
use crate::Config;

pub async fn run() -> Result<()> {
    let root = workspace_root()?;

    if Config::is_initialized(&root) {
        bail!(
            "pcdindex is already initialized in {:?}",
            Config::pcdindex_dir(&root)
        );
    }

    let config = Config::default();
    config.save(&root)?;

    info!("Initialized pcdindex in {:?}", Config::pcdindex_dir(&root));
    println!(
        "✓ Created {} with default configuration",
        Config::pcdindex_dir(&root).display()
    );
    println!("\nNext steps:");
    println!("  1. Edit .pcdindex/config.toml to customize settings");
    println!("  2. Run 'pcdindex index' to check the declaration files");
    println!("  3. Run 'pcdindex serve' to start the MCP server");

    Ok(())
}
