//! Configuration management commands.

use crate::cli::ConfigCommand;
use crate::config::OutputFormat;
use crate::output::{info, success};
use crate::{CliConfig, CliError, CliResult};

/// Runs a config command.
pub fn run_config(cmd: ConfigCommand, config: &mut CliConfig) -> CliResult<()> {
    match cmd {
        ConfigCommand::Show => show_config(config),
        ConfigCommand::Set { key, value } => {
            apply_setting(config, &key, &value)?;
            config.save()?;
            success(&format!("Set {key} = {value}"));
            Ok(())
        }
        ConfigCommand::Init => init_config(config),
    }
}

/// Shows the current configuration.
fn show_config(config: &CliConfig) -> CliResult<()> {
    let config_path = CliConfig::config_path()?;

    info(&format!("Configuration file: {}", config_path.display()));
    println!();
    println!("server_url: {}", config.server_url);
    println!("login_realm: {}", config.login_realm);
    println!("client_id: {}", config.client_id);
    if let Some(username) = &config.username {
        println!("username: {username}");
    }
    println!("timeout_secs: {}", config.timeout_secs);
    println!("output_format: {:?}", config.output_format);

    Ok(())
}

/// Sets one configuration value in memory.
fn apply_setting(config: &mut CliConfig, key: &str, value: &str) -> CliResult<()> {
    match key {
        "server_url" | "server" => config.server_url = value.to_string(),
        "login_realm" => config.login_realm = value.to_string(),
        "client_id" => config.client_id = value.to_string(),
        "username" | "user" => {
            config.username = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.to_string())
            };
        }
        "timeout_secs" | "timeout" => {
            config.timeout_secs = value.parse().map_err(|_| {
                CliError::InvalidArgument(format!("timeout must be a number of seconds: {value}"))
            })?;
        }
        "output_format" | "output" => config.output_format = value.parse::<OutputFormat>()?,
        _ => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown configuration key: {key}. Known keys: server_url, login_realm, client_id, username, timeout_secs, output_format"
            )));
        }
    }
    Ok(())
}

/// Reads one line, returning `None` when the user keeps the current value.
fn prompt_line(label: &str, current: &str) -> CliResult<Option<String>> {
    print!("{label} [{current}]: ");
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let trimmed = input.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

/// Initializes configuration interactively.
fn init_config(config: &mut CliConfig) -> CliResult<()> {
    let config_path = CliConfig::config_path()?;

    info("Initializing kcc configuration...");
    println!();

    if let Some(value) = prompt_line("Server URL", &config.server_url)? {
        config.server_url = value;
    }
    if let Some(value) = prompt_line("Login realm", &config.login_realm)? {
        config.login_realm = value;
    }
    if let Some(value) = prompt_line("Client ID", &config.client_id)? {
        config.client_id = value;
    }
    let current_user = config.username.clone().unwrap_or_else(|| "(none)".to_string());
    if let Some(value) = prompt_line("Username", &current_user)? {
        apply_setting(config, "username", &value)?;
    }
    let current_format = format!("{:?}", config.output_format).to_lowercase();
    if let Some(value) = prompt_line("Output format (table/json/quiet)", &current_format)? {
        apply_setting(config, "output_format", &value)?;
    }

    config.save()?;

    println!();
    success(&format!("Configuration saved to: {}", config_path.display()));
    Ok(())
}
