use alertdeck_core::config::AppConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
use commands::{
    detect_versions, handle_config_command, pull_once, utils::load_config, ConfigCommands,
    OutputFormat,
};

#[derive(Parser)]
#[command(name = "alertdeck-cli")]
#[command(about = "alertdeck CLI - diagnostics for Alertmanager instance polling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file
    #[arg(long, global = true, env = "ALERTDECK_CONFIG", default_value = "config/config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration Management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Detect the Alertmanager version of configured instances
    Version {
        /// Only probe these instances (can be specified multiple times)
        #[arg(short, long)]
        instance: Vec<String>,
    },

    /// Run a single pull cycle and print the resulting snapshot
    Pull {
        /// Only pull these instances (can be specified multiple times)
        #[arg(short, long)]
        instance: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "summary")]
        format: OutputFormat,
    },
}

/// Initializes logging from the configuration, honoring `RUST_LOG`.
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,alertdeck_core={0},cli={0}", config.logging.level))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format.as_str() == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_target(false);
        registry.with(fmt_layer).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config(config_command) => {
            handle_config_command(config_command, &cli.config)?;
        }

        Commands::Version { instance } => {
            let config = load_config(&cli.config)?;
            init_logging(&config);
            detect_versions(&config, &instance).await?;
        }

        Commands::Pull { instance, format } => {
            let config = load_config(&cli.config)?;
            init_logging(&config);
            tracing::debug!(instances = config.instances.len(), "configuration loaded");
            pull_once(&config, &instance, format).await?;
        }
    }

    Ok(())
}
