use std::fmt;

use alertdeck_core::{config::AppConfig, upstream::UpstreamError};

#[derive(Debug)]
pub enum CliError {
    Config(String),
    Io(String),
    Upstream(String),
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Upstream(msg) => write!(f, "Upstream error: {msg}"),
            Self::General(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<UpstreamError> for CliError {
    fn from(error: UpstreamError) -> Self {
        Self::Upstream(error.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self::General(error.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;

pub fn print_success(message: &str) {
    println!("[SUCCESS] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn print_info(message: &str) {
    println!("[INFO] {message}");
}

/// Loads and validates the configuration at `file`.
pub fn load_config(file: &str) -> CliResult<AppConfig> {
    let config = AppConfig::from_file(file).map_err(|e| CliError::Config(e.to_string()))?;
    config.validate().map_err(CliError::Config)?;
    Ok(config)
}

/// Keeps instances named in `only`, or all of them when `only` is empty.
pub fn select_instances(
    config: &AppConfig,
    only: &[String],
) -> CliResult<Vec<alertdeck_core::Instance>> {
    let instances: Vec<_> = config
        .instances()
        .into_iter()
        .filter(|i| only.is_empty() || only.iter().any(|name| name.as_str() == i.name.as_ref()))
        .collect();

    if instances.is_empty() {
        return Err(CliError::Config(format!("No configured instance matches {only:?}")));
    }
    Ok(instances)
}
