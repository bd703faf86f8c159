pub mod env;
mod loader;

pub use env::{AppConfig, ConfigError, DirectoryConfig, ScanSettings};
pub use loader::load_config;
