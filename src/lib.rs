pub mod cli;
pub mod commands;
pub mod config;
pub mod document;
pub mod logging;
pub mod mcp;
pub mod symbol;
pub mod watcher;
pub mod workspace;

pub use config::Config;
pub use workspace::Workspace;
