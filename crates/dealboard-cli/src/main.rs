mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{business, comment, deal, enriched};

#[derive(Parser)]
#[command(name = "dealboard")]
#[command(about = "Dealboard CLI - Interact with the Dealboard food deals service")]
#[command(version)]
struct Cli {
    #[arg(long, global = true, help = "API server URL")]
    server: Option<String>,

    #[arg(long, global = true, help = "Output format", default_value = "table")]
    format: output::Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure CLI settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage businesses
    #[command(alias = "biz")]
    Business {
        #[command(subcommand)]
        command: business::Commands,
    },
    /// Manage deals
    Deal {
        #[command(subcommand)]
        command: deal::Commands,
    },
    /// Manage comments
    Comment {
        #[command(subcommand)]
        command: comment::Commands,
    },
    /// Browse the enriched deal view
    Enriched {
        #[command(subcommand)]
        command: enriched::Commands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration values
    Set {
        #[arg(long)]
        server: Option<String>,
    },
    /// Show current configuration
    Show,
    /// Get config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::Config::load()?;

    if let Some(server) = &cli.server {
        cfg.server = server.clone();
    }

    match cli.command {
        Commands::Config { command } => match command {
            ConfigCommands::Set { server } => {
                if let Some(s) = server {
                    cfg.server = s;
                }
                cfg.save()?;
                println!("Configuration saved");
            }
            ConfigCommands::Show => {
                println!("Server: {}", cfg.server);
            }
            ConfigCommands::Path => {
                println!("{}", config::config_path()?.display());
            }
        },
        Commands::Business { command } => {
            business::run(command, &cfg, cli.format).await?;
        }
        Commands::Deal { command } => {
            deal::run(command, &cfg, cli.format).await?;
        }
        Commands::Comment { command } => {
            comment::run(command, &cfg, cli.format).await?;
        }
        Commands::Enriched { command } => {
            enriched::run(command, &cfg, cli.format).await?;
        }
    }

    Ok(())
}
