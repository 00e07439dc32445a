use alertdeck_core::config::AppConfig;
use clap::Subcommand;
use std::path::Path;

use super::utils::{print_error, print_info, print_success, CliError, CliResult};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate the current configuration
    Validate,

    /// Show current configuration
    Show,

    /// Generate a sample configuration file
    Generate {
        /// Output path for the config file
        #[arg(short, long, default_value = "config/config.toml")]
        output: String,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_config_command(command: ConfigCommands, file: &str) -> CliResult<()> {
    match command {
        ConfigCommands::Validate => validate_config(file),
        ConfigCommands::Show => show_config(file),
        ConfigCommands::Generate { output, force } => generate_config(&output, force),
    }
}

fn validate_config(file: &str) -> CliResult<()> {
    if !Path::new(file).exists() {
        print_error(&format!("Configuration file not found: {file}"));
        return Err(CliError::Config(format!("File not found: {file}")));
    }

    print_info(&format!("Loading configuration from {file}..."));
    let config = AppConfig::from_file(file).map_err(|e| CliError::Config(e.to_string()))?;

    print_info("Validating configuration...");
    config.validate().map_err(CliError::Config)?;

    print_success("Configuration is valid!");

    println!("Configuration Summary:");
    println!("  Instances: {}", config.instances.len());
    println!("  Colored labels: {}", config.colors.labels.len());
    println!("  JIRA rules: {}", config.jira.len());

    Ok(())
}

fn show_config(file: &str) -> CliResult<()> {
    let config = AppConfig::from_file(file).map_err(|e| CliError::Config(e.to_string()))?;

    println!("Configuration from {file}:");

    println!("\n[Instances] ({} configured)", config.instances.len());
    for instance in config.instances() {
        println!(
            "  {}: {} (timeout {}s)",
            instance.name,
            instance.uri,
            instance.timeout.as_secs()
        );
        if instance.proxy {
            println!("    Proxied as: {}", instance.public_uri());
        }
    }

    println!("\n[Listen]");
    println!("  Prefix: {}", config.listen.prefix);

    println!("\n[Colors]");
    println!("  Labels: {}", config.colors.labels.join(", "));

    println!("\n[JIRA]");
    for rule in &config.jira {
        println!("  {} -> {}", rule.regex, rule.uri);
    }

    println!("\n[HTTP]");
    println!("  Concurrent Limit: {}", config.http.concurrent_limit);
    println!("  Permit Timeout: {}ms", config.http.permit_timeout_ms);

    println!("\n[Logging]");
    println!("  Level: {}", config.logging.level);
    println!("  Format: {}", config.logging.format);

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# alertdeck configuration

# One entry per Alertmanager instance
[[instances]]
name = "default"
uri = "http://localhost:9093"
timeout_seconds = 40
proxy = false

[listen]
prefix = "/"

# Label keys that get a color; "@receiver" colors alert receivers
[colors]
labels = ["cluster", "@receiver"]

# Issue-tracker links detected in silence comments
[[jira]]
regex = "[A-Z]+-[0-9]+"
uri = "https://jira.example.com"

[http]
concurrent_limit = 64
permit_timeout_ms = 5000

[logging]
level = "info"
format = "pretty"
"#;

fn generate_config(output: &str, force: bool) -> CliResult<()> {
    if Path::new(output).exists() && !force {
        return Err(CliError::Config(format!(
            "File {output} already exists. Use --force to overwrite."
        )));
    }

    if let Some(parent) = Path::new(output).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output, SAMPLE_CONFIG)?;

    print_success(&format!("Sample configuration written to {output}"));
    Ok(())
}
