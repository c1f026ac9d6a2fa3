// Configuration module
// Public interface for configuration loading

pub mod constants;
mod loader;
mod settings;

pub use loader::{load_config, load_layered};
pub use settings::{LogFormat, LoggingConfig, OutputConfig, ScraperConfig, ServerConfig, Settings};
