//! Index command implementation.
//!
//! Builds the index for the current directory and reports what it found.

use anyhow::Result;
use std::time::Instant;

use super::workspace_root;
use crate::symbol::IndexEntry;
use crate::{Config, Workspace};

/// Run the index command.
///
/// # Arguments
///
/// * `list` - Print every indexed PCD with its location
pub async fn run(list: bool) -> Result<()> {
    let root = workspace_root()?;
    let config = Config::load(&root)?;

    let started = Instant::now();
    let workspace = Workspace::open(root.clone(), &config).await?;
    let elapsed = started.elapsed();

    let entries = workspace.entries().await;
    let collisions = workspace.collisions().await;

    println!("Workspace root: {}", root.display());
    println!(
        "Indexed {} PCDs from {} declaration files in {:.2}s",
        entries.len(),
        workspace.document_count().await,
        elapsed.as_secs_f64()
    );

    if !collisions.is_empty() {
        println!("\n{} PCDs are declared in more than one file:", collisions.len());
        for collision in &collisions {
            println!(
                "  {}: {} replaced by {}",
                collision.symbol, collision.previous, collision.replacement
            );
        }
    }

    if list {
        println!();
        for entry in &entries {
            println!("{}", format_entry(entry, &root));
        }
    }

    Ok(())
}

fn format_entry(entry: &IndexEntry, root: &std::path::Path) -> String {
    let path = entry.document().path();
    let shown = path.strip_prefix(root).unwrap_or(path);
    format!("{:<48} {}:{}", entry.symbol, shown.display(), entry.span.start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentId, Position};
    use crate::symbol::SourceSpan;
    use std::path::Path;

    #[test]
    fn test_format_entry_strips_root() {
        let entry = IndexEntry {
            symbol: "PcdFlashBase".to_string(),
            span: SourceSpan {
                document: DocumentId::from("/ws/MdePkg/MdePkg.dec"),
                start: Position::new(3, 2),
                end: Position::new(3, 40),
                offsets: 10..48,
            },
        };

        let line = format_entry(&entry, Path::new("/ws"));
        assert!(line.starts_with("PcdFlashBase "));
        assert!(line.ends_with("MdePkg/MdePkg.dec:4:3"));
    }
}
