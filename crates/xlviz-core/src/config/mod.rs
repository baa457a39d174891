//! Configuration management for xlviz

mod args_loader;
mod chart_config;
#[allow(clippy::module_inception)]
mod config;
mod defaults;
mod env_loader;
mod file_loader;
mod logging_config;
mod workbook_config;

pub mod loader;

pub use chart_config::ChartConfig;
pub use config::Config;
pub use defaults::{DEFAULT_CONFIG_FILE, load_config, load_config_with_overrides};
pub use loader::{ConfigLoader, ConfigSource};
pub use logging_config::LoggingConfig;
pub use workbook_config::WorkbookConfig;
