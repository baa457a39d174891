//! xlviz: spreadsheet tools served over MCP
//!
//! ```bash
//! xlviz --default-dir ~/spreadsheets serve
//! ```
//!
//! Requests are read from stdin and answered on stdout, so all logging
//! goes to stderr.

mod args;

use anyhow::Context;
use args::{Cli, Commands};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use xlviz_core::config::load_config_with_overrides;
use xlviz_core::{Config, LoggingConfig, McpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config_with_overrides(cli.config.as_deref(), cli.overrides())
        .context("Failed to load configuration")?;
    init_logging(&config.logging);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config).await,
        Commands::Tools => {
            list_tools(&config);
            Ok(())
        }
    }
}

/// Initialize logging; `RUST_LOG` takes precedence over the configured level
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.is_json() {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    let mut server = McpServer::new("xlviz", env!("CARGO_PKG_VERSION"))
        .with_tools(xlviz_tools::default_registry(config));
    for provider in xlviz_tools::get_resource_providers(config) {
        server = server.with_resource(provider);
    }

    info!(
        default_dir = %config.workbook.resolved_default_directory().display(),
        "Starting xlviz MCP server on stdio"
    );
    server.serve_stdio().await.context("MCP server stopped")?;
    info!("Client disconnected, shutting down");
    Ok(())
}

fn list_tools(config: &Config) {
    let registry = xlviz_tools::default_registry(config);
    let mut tools = registry.all_tools();
    tools.sort_by(|a, b| a.name().cmp(b.name()));

    println!("Available tools ({}):\n", tools.len());
    for tool in tools {
        let mode = if tool.is_read_only() { "" } else { " [writes]" };
        println!("  {}{}", tool.name(), mode);
        println!("      {}", tool.description());
    }
}
