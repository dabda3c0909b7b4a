//! Command implementations.

pub mod config;
pub mod import;

pub use config::run_config;
pub use import::run_import;

use std::time::Duration;

use kcc_remote::rest::{AdminClientConfig, Credentials};

use crate::cli::ConnectionArgs;
use crate::output::prompt_password;
use crate::{CliConfig, CliError, CliResult};

/// Builds the admin client settings from flags, falling back to the config.
///
/// The password is prompted for when neither `--password` nor
/// `KCC_PASSWORD` provides it.
pub fn admin_client_config(
    config: &CliConfig,
    connection: &ConnectionArgs,
) -> CliResult<AdminClientConfig> {
    let (server_url, credentials) = resolve_credentials(config, connection)?;
    let password = match &connection.password {
        Some(password) => password.clone(),
        None => prompt_password(&format!("Password for {}: ", credentials.username))?,
    };

    Ok(AdminClientConfig {
        server_url,
        timeout: Duration::from_secs(config.timeout_secs),
        credentials: Credentials {
            password,
            ..credentials
        },
    })
}

/// Resolves everything but the password.
fn resolve_credentials(
    config: &CliConfig,
    connection: &ConnectionArgs,
) -> CliResult<(String, Credentials)> {
    let username = connection
        .username
        .clone()
        .or_else(|| config.username.clone())
        .ok_or_else(|| {
            CliError::Config(
                "no username configured; use --username, KCC_USERNAME or `kcc config set username`"
                    .to_string(),
            )
        })?;

    let server_url = connection
        .server
        .clone()
        .unwrap_or_else(|| config.server_url.clone());

    Ok((
        server_url,
        Credentials {
            login_realm: connection
                .login_realm
                .clone()
                .unwrap_or_else(|| config.login_realm.clone()),
            client_id: connection
                .client_id
                .clone()
                .unwrap_or_else(|| config.client_id.clone()),
            username,
            password: String::new(),
        },
    ))
}
