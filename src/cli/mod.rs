use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::symbol::CompletionMode;

#[derive(Parser)]
#[command(name = "pcdindex")]
#[command(author, version, about = "PCD declaration index for UEFI .dec files")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize pcdindex in the current directory
    Init,

    /// Index the declaration files under the current directory
    Index {
        /// Print every indexed PCD with its location
        #[arg(short, long)]
        list: bool,
    },

    /// Find where a PCD is declared
    Definition {
        /// PCD name (ignored when --file is given)
        #[arg(required_unless_present = "file")]
        symbol: Option<String>,

        /// C, DSC or FDF file to take the identifier under the cursor from
        #[arg(short, long, requires = "line")]
        file: Option<PathBuf>,

        /// Zero-based cursor line
        #[arg(short, long)]
        line: Option<u32>,

        /// Zero-based cursor character
        #[arg(short, long, default_value = "0")]
        character: u32,
    },

    /// Complete a partially typed PCD name
    Complete {
        /// Partial PCD name, e.g. PcdMax
        partial: String,

        /// Matching mode (default: from configuration)
        #[arg(short, long, value_enum)]
        mode: Option<CompletionMode>,
    },

    /// Watch for declaration file changes and keep the index current
    Watch {
        /// Debounce delay in milliseconds (default: from configuration)
        #[arg(short, long)]
        debounce_ms: Option<u64>,
    },

    /// Start the MCP server on stdio
    Serve {
        /// Do not watch for declaration file changes while serving
        #[arg(long)]
        no_watch: bool,
    },
}
