//! Definition command implementation.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use super::workspace_root;
use crate::document::{Document, DocumentId, DocumentKind, Position};
use crate::symbol::SourceSpan;
use crate::{Config, Workspace};

/// Run the definition command
///
/// # Arguments
///
/// * `symbol` - PCD name to resolve
/// * `file` - Consumer file to take the cursor word from instead
/// * `line` - Zero-based cursor line in `file`
/// * `character` - Zero-based cursor character in `file`
pub async fn run(
    symbol: Option<String>,
    file: Option<PathBuf>,
    line: Option<u32>,
    character: u32,
) -> Result<()> {
    let root = workspace_root()?;
    let config = Config::load(&root)?;
    let workspace = Workspace::open(root.clone(), &config).await?;

    let span = match (file, symbol) {
        (Some(file), _) => {
            let document = read_consumer(&file).await?;
            let position = Position::new(line.unwrap_or(0), character);
            workspace.definition_at(&document, position).await
        }
        (None, Some(symbol)) => workspace.definition(&symbol).await,
        (None, None) => bail!("Either a symbol or --file is required"),
    };

    match span {
        Some(span) => println!("{}", format_location(&span, &root)),
        None => println!("Definition not found."),
    }

    Ok(())
}

async fn read_consumer(file: &Path) -> Result<Document> {
    let Some(kind) = DocumentKind::from_path(file) else {
        bail!("{} is not a C, DSC or FDF file", file.display());
    };
    tracing::debug!("Reading {} consumer {:?}", kind, file);

    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {:?}", file))?;
    Ok(Document::new(DocumentId::new(file), text))
}

fn format_location(span: &SourceSpan, root: &Path) -> String {
    let path = span.document.path();
    let shown = path.strip_prefix(root).unwrap_or(path);
    format!("{}:{}-{}", shown.display(), span.start, span.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_location() {
        let span = SourceSpan {
            document: DocumentId::from("/ws/MdePkg/MdePkg.dec"),
            start: Position::new(0, 2),
            end: Position::new(0, 50),
            offsets: 2..50,
        };
        assert_eq!(
            format_location(&span, Path::new("/ws")),
            "MdePkg/MdePkg.dec:1:3-1:51"
        );
    }

    #[tokio::test]
    async fn test_read_consumer_rejects_declaration_files() {
        let result = read_consumer(Path::new("MdePkg.dec")).await;
        assert!(result.is_err());
    }
}
