use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::resource::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        cli_config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                cli_config_path
                                    .unwrap_or_else(Config::default_config_path)
                                    .display()
                            );
                        }
                        println!();

                        println!("api_url: {}", config.api_url.value);
                        println!("  source: {}", config.api_url.source);
                        println!();

                        println!("timeout_secs: {}", config.timeout_secs.value);
                        println!("  source: {}", config.timeout_secs.source);
                        println!();

                        match (&config.auth.username, config.auth.credentials()) {
                            (Some(user), Some(_)) => println!("auth: basic ({})", user),
                            (Some(user), None) => {
                                println!("auth: anonymous (username {} has no password)", user)
                            }
                            (None, _) => println!("auth: anonymous"),
                        }
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = cli_config_path.unwrap_or_else(Config::default_config_path);

                // Check if config already exists
                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'groupstore config show' to view current configuration.");
                    return Ok(());
                }

                // Create parent directory
                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let default_config = r#"# groupstore configuration

# Root URL of the store API
api_url: http://localhost:8080/api

# Request timeout in seconds
timeout_secs: 30

# Credentials sent with every request (omit for anonymous access)
# auth:
#   username: admin
#   password: secret
"#;

                let mut file = fs::File::create(&config_path)?;
                file.write_all(default_config.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}
