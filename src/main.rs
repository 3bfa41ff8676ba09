use tracing::info;
use tracing_subscriber::EnvFilter;

use clap::Parser;

mod cli;
mod errors;
mod flag;
mod github;
mod repository;
mod rollout;
mod server;

use cli::{Cli, Commands, ServerCommands};
use rollout::RolloutSettings;
use server::{Server, config::ServerConfig};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new("flagflow=info,tower_http=debug"))?,
        )
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server { command } => match command {
            ServerCommands::Start {
                address,
                port,
                github_token,
                github_api_url,
                repository,
                base_branch,
                branch_prefix,
                default_variation,
            } => {
                let config = ServerConfig {
                    address,
                    port,
                    github_token,
                    github_api_url,
                    repository,
                    rollout: RolloutSettings {
                        base_branch,
                        branch_prefix,
                        default_variation,
                    },
                };

                info!("Starting flagflow server");
                Server::new(&config)?.start().await?;
            }
        },
    }

    Ok(())
}
