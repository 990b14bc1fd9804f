//! MCP (Model Context Protocol) server for PCD lookups.
//!
//! Serves the workspace index over stdio so editor agents and LLM clients
//! can resolve and complete PCD names.
//!
//! ```ignore
//! use pcdindex::mcp::PcdServer;
//!
//! let server = PcdServer::new(workspace, root);
//! server.run().await?;
//! ```

mod server;

pub use server::PcdServer;
