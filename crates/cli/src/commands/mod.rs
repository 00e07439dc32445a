pub mod config;
pub mod pull;
pub mod utils;

pub use config::{handle_config_command, ConfigCommands};
pub use pull::{detect_versions, pull_once, OutputFormat};
