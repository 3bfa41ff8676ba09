use std::net::Ipv4Addr;

use clap::{Parser, Subcommand};

use crate::flag::DefaultVariation;
use crate::repository::Repository;

#[derive(Parser)]
#[command(version, about, long_about = None, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Server {
        #[command(subcommand)]
        command: ServerCommands,
    },
}

#[derive(Subcommand)]
pub enum ServerCommands {
    /// Serve the feature flag webhook
    Start {
        /// The server address to bind to
        #[arg(short, long, default_value = "0.0.0.0", env("SERVER_ADDRESS"))]
        address: Ipv4Addr,
        /// The port to run the server on
        #[arg(short, long, default_value = "3000", env("SERVER_PORT"))]
        port: u16,
        /// Token used as bearer credential against the GitHub API
        #[arg(long, env("GITHUB_TOKEN"), hide_env_values = true)]
        github_token: String,
        /// Base url of the GitHub REST API
        #[arg(long, env("GITHUB_API_URL"), default_value = "https://api.github.com")]
        github_api_url: String,
        /// Repository holding the flag files, as owner/repo
        #[arg(short, long, env("GITHUB_REPOSITORY"))]
        repository: Repository,
        /// Branch the flag files are read from and pull requests target
        #[arg(long, env("BASE_BRANCH"), default_value = "main")]
        base_branch: String,
        /// Prefix of the branches created for each request
        #[arg(long, env("BRANCH_PREFIX"), default_value = "testbranch")]
        branch_prefix: String,
        /// How `defaultVariation` is written when a flag is turned on
        #[arg(long, env("DEFAULT_VARIATION"), value_enum, default_value_t = DefaultVariation::Boolean)]
        default_variation: DefaultVariation,
    },
}
