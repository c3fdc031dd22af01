use std::path::PathBuf;

use color_eyre::{
    Result,
    eyre::{WrapErr, eyre},
};
use tokio::process::Command;
use tracing::debug;

use crate::config::Config;
use crate::types::Credentials;

pub const TOKEN_CLI_BIN: &str = "remote-service-cli";

/// Mints bearer tokens by invoking the remote-service CLI.
pub struct TokenMinter {
    cli_dir: PathBuf,
}

impl TokenMinter {
    pub fn new(cli_dir: impl Into<PathBuf>) -> Self {
        Self {
            cli_dir: cli_dir.into(),
        }
    }

    /// Runs `<dir>/remote-service-cli token create` and returns the token from
    /// stdout. Any stderr content is fatal, even on a zero exit status: the
    /// CLI writes diagnostics there only when something went wrong.
    pub async fn mint(&self, config: &Config, credentials: &Credentials) -> Result<String> {
        debug!(
            "fetching token from organization {} and environment {}",
            config.org, config.env
        );

        let output = Command::new(self.cli_dir.join(TOKEN_CLI_BIN))
            .args([
                "token",
                "create",
                "--legacy",
                "-o",
                config.org.as_str(),
                "-e",
                config.env.as_str(),
                "-i",
                credentials.key.as_str(),
                "-s",
                credentials.secret.as_str(),
            ])
            .output()
            .await
            .wrap_err("failed to run token minting command")?;

        if !output.stderr.is_empty() {
            return Err(eyre!(
                "token minting reported errors: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }
        if !output.status.success() {
            return Err(eyre!("token minting exited with {}", output.status));
        }

        token_from_stdout(&output.stdout)
    }
}

/// Strips exactly one trailing line terminator from the CLI output.
fn token_from_stdout(stdout: &[u8]) -> Result<String> {
    let raw = std::str::from_utf8(stdout).wrap_err("token output is not valid utf-8")?;
    let token = raw
        .strip_suffix("\r\n")
        .or_else(|| raw.strip_suffix('\n'))
        .unwrap_or(raw);
    if token.is_empty() {
        return Err(eyre!("token minting produced an empty token"));
    }
    Ok(token.to_string())
}
