//! MCP server exposing PCD definition and completion lookups.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::document::{Document, DocumentId, DocumentKind, Position};
use crate::symbol::{CompletionMode, SourceSpan};
use crate::workspace::Workspace;

/// Request parameters for a definition lookup
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FindDefinitionRequest {
    /// PCD name, or text containing one
    #[schemars(description = "PCD name to resolve, e.g. 'PcdMaximumUnicodeStringLength'")]
    symbol: Option<String>,

    /// File to read the identifier under the cursor from
    #[schemars(description = "C, DSC or FDF file (relative to the workspace root) to take the cursor word from")]
    file: Option<String>,

    /// Zero-based cursor line
    #[schemars(description = "Zero-based line of the cursor in 'file'")]
    line: Option<u32>,

    /// Zero-based cursor character
    #[schemars(description = "Zero-based character of the cursor in 'file'")]
    character: Option<u32>,
}

/// Request parameters for completion
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CompleteSymbolRequest {
    /// Partially typed PCD name
    #[schemars(description = "Partially typed PCD name, starting with 'Pcd'")]
    partial: String,

    /// Matching mode override
    #[schemars(description = "'prefix' or 'substring' (default: workspace setting)")]
    mode: Option<String>,
}

/// Request parameters for listing indexed symbols
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListSymbolsRequest {
    /// Optional glob over declaration file paths
    #[schemars(description = "Optional glob over declaration file paths, e.g. '**/MdePkg.dec'")]
    pattern: Option<String>,
}

/// MCP server over one workspace's PCD index
#[derive(Clone)]
pub struct PcdServer {
    workspace: Arc<Workspace>,
    root_path: PathBuf,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PcdServer {
    pub fn new(workspace: Arc<Workspace>, root_path: PathBuf) -> Self {
        Self {
            workspace,
            root_path,
            tool_router: Self::tool_router(),
        }
    }

    /// Resolve a PCD name to its declaration
    #[tool(
        name = "find_definition",
        description = "Find where a PCD is declared. Pass 'symbol', or 'file' with 'line' and 'character' to resolve the identifier under a cursor in a C, DSC or FDF file."
    )]
    async fn find_definition(
        &self,
        Parameters(req): Parameters<FindDefinitionRequest>,
    ) -> Result<CallToolResult, McpError> {
        let span = match (&req.symbol, &req.file) {
            (Some(symbol), _) => self.workspace.definition(symbol).await,
            (None, Some(file)) => {
                let document = self.read_consumer(file).await?;
                let position = Position::new(req.line.unwrap_or(0), req.character.unwrap_or(0));
                self.workspace.definition_at(&document, position).await
            }
            (None, None) => {
                return Err(McpError::invalid_params(
                    "Either 'symbol' or 'file' is required".to_string(),
                    None,
                ))
            }
        };

        let output = match span {
            Some(span) => format_span(&span),
            None => "Definition not found.".to_string(),
        };

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    /// Complete a partially typed PCD name
    #[tool(
        name = "complete_symbol",
        description = "List declared PCD names matching a partially typed name."
    )]
    async fn complete_symbol(
        &self,
        Parameters(req): Parameters<CompleteSymbolRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mode = match req.mode.as_deref() {
            Some(mode) => mode
                .parse::<CompletionMode>()
                .map_err(|e| McpError::invalid_params(e, None))?,
            None => self.workspace.completion_mode(),
        };

        let candidates = self.workspace.completions_with_mode(&req.partial, mode).await;

        let output = if candidates.is_empty() {
            format!("No PCDs match '{}'.", req.partial)
        } else {
            candidates.join("\n")
        };

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    /// List indexed PCDs with their locations
    #[tool(
        name = "list_symbols",
        description = "List every indexed PCD with its declaration location, optionally limited to declaration files matching a glob."
    )]
    async fn list_symbols(
        &self,
        Parameters(req): Parameters<ListSymbolsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let pattern = req
            .pattern
            .as_deref()
            .map(glob::Pattern::new)
            .transpose()
            .map_err(|e| McpError::invalid_params(format!("Invalid pattern: {}", e), None))?;

        let entries: Vec<_> = self
            .workspace
            .entries()
            .await
            .into_iter()
            .filter(|entry| {
                pattern
                    .as_ref()
                    .map_or(true, |p| p.matches_path(entry.document().path()))
            })
            .collect();

        let output = if entries.is_empty() {
            "No PCDs indexed.".to_string()
        } else {
            let mut output = format!("{} PCDs:\n", entries.len());
            for entry in &entries {
                output.push_str(&format!("{}  {}\n", entry.symbol, entry.span));
            }
            output
        };

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    /// Run the MCP server using stdio transport
    pub async fn run(self) -> anyhow::Result<()> {
        let service = self.serve(stdio()).await?;
        service.waiting().await?;
        Ok(())
    }

    async fn read_consumer(&self, file: &str) -> Result<Document, McpError> {
        let path = self.root_path.join(file);

        if DocumentKind::from_path(&path).is_none() {
            return Err(McpError::invalid_params(
                format!("'{}' is not a C, DSC or FDF file", file),
                None,
            ));
        }

        let canonical = path.canonicalize().map_err(|e| {
            McpError::invalid_params(format!("Invalid path '{}': {}", file, e), None)
        })?;
        let root_canonical = self.root_path.canonicalize().map_err(|e| {
            McpError::internal_error(format!("Failed to resolve root path: {}", e), None)
        })?;
        if !canonical.starts_with(&root_canonical) {
            return Err(McpError::invalid_params(
                format!("Path '{}' is outside the workspace root", file),
                None,
            ));
        }

        let text = tokio::fs::read_to_string(&canonical).await.map_err(|e| {
            McpError::invalid_params(format!("Failed to read file '{}': {}", file, e), None)
        })?;

        Ok(Document::new(DocumentId::new(canonical), text))
    }
}

fn format_span(span: &SourceSpan) -> String {
    format!(
        "{}:{}-{}",
        span.document.path().display(),
        span.start,
        span.end
    )
}

#[tool_handler]
impl ServerHandler for PcdServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pcdindex".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: Some("PCD Declaration Index".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Resolves UEFI PCD names to their declarations in .dec files.\n\n\
                 Available tools:\n\
                 - find_definition: where a PCD is declared\n\
                 - complete_symbol: declared PCD names matching a partial name\n\
                 - list_symbols: every indexed PCD, optionally filtered by file glob"
                    .into(),
            ),
        }
    }
}
