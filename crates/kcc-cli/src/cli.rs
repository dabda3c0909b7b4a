//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::OutputFormat;

/// kcc - Converges realm groups, roles and composites to import documents.
#[derive(Debug, Parser)]
#[command(name = "kcc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Server connection (overrides config).
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Output format (overrides config).
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Server connection options.
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Server URL.
    #[arg(short, long, env = "KCC_SERVER_URL")]
    pub server: Option<String>,

    /// Realm the admin user logs into.
    #[arg(long, env = "KCC_LOGIN_REALM")]
    pub login_realm: Option<String>,

    /// Client used to obtain the admin token.
    #[arg(long, env = "KCC_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Admin username.
    #[arg(short, long, env = "KCC_USERNAME")]
    pub username: Option<String>,

    /// Admin password. Prompted for when not given.
    #[arg(long, env = "KCC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import realm documents.
    Import(ImportArgs),

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Import arguments.
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Import files, or directories of `*.json` files.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Target realm (overrides the realm of every document).
    #[arg(long)]
    pub realm: Option<String>,
}

/// Config commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Initialize configuration interactively.
    Init,
}
