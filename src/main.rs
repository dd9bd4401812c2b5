use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use groupstore_core::{Anonymous, ApiPaths, StoreClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

use commands::{ConfigCommand, GroupCommand, UserCommand};
use config::Config;

#[derive(Parser)]
#[command(name = "groupstore")]
#[command(version)]
#[command(about = "Manage groups and users in a versioned REST store", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log requests and responses to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage groups
    Group(GroupCommand),

    /// Manage users within a group
    User(UserCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Save config path for the config command
    let cli_config_path = cli.config.clone();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Group(cmd)) => {
            let (client, paths) = connect(&config)?;
            cmd.run(&client, &paths).await?;
        }
        Some(Commands::User(cmd)) => {
            let (client, paths) = connect(&config)?;
            cmd.run(&client, &paths).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config, cli_config_path)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("groupstore=debug,groupstore_core=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("groupstore=warn,groupstore_core=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Builds the store client and path builder from configuration.
fn connect(config: &Config) -> Result<(StoreClient, ApiPaths), reqwest::Error> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs.value))
        .build()?;

    let client = match config.auth.credentials() {
        Some(creds) => {
            tracing::debug!(username = %creds.username, "using basic credentials");
            StoreClient::with_client(http, creds)
        }
        None => StoreClient::with_client(http, Anonymous),
    };

    tracing::debug!(api_url = %config.api_url.value, "store client ready");
    Ok((client, ApiPaths::new(&config.api_url.value)))
}
