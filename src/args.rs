//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xlviz")]
#[command(about = "MCP server for inspecting, querying and charting spreadsheet files")]
#[command(
    long_about = r#"MCP server for inspecting, querying and charting spreadsheet files

USAGE:
  xlviz                          # Serve MCP over stdin/stdout
  xlviz serve                    # Same as above
  xlviz tools                    # List available tools

Relative file paths in tool calls are resolved against --default-dir
(or XLVIZ_DEFAULT_DIR, or the configuration file)."#
)]
#[command(version)]
pub struct Cli {
    /// Path to a configuration file (TOML or JSON)
    #[arg(long, env = "XLVIZ_CONFIG")]
    pub config: Option<String>,

    /// Directory relative file paths are resolved against
    #[arg(long)]
    pub default_dir: Option<PathBuf>,

    /// Files above this size (MB) use capped previews and columnar processing
    #[arg(long)]
    pub large_file_mb: Option<u64>,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Serve MCP requests over stdin/stdout
    Serve,
    /// List the available tools
    Tools,
}

impl Cli {
    /// Configuration overrides given on the command line
    pub fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(dir) = &self.default_dir {
            overrides.insert("default_directory".to_string(), dir.display().to_string());
        }
        if let Some(mb) = self.large_file_mb {
            overrides.insert("large_file_threshold_mb".to_string(), mb.to_string());
        }
        if self.verbose {
            overrides.insert("log_level".to_string(), "debug".to_string());
        }
        overrides
    }
}
