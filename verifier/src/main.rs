use color_eyre::Result;
use reqwest::StatusCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use verifier::config::Config;
use verifier::management::ManagementClient;
use verifier::session::VerificationSession;
use verifier::token::TokenMinter;
use verifier::types::{CredentialKind, RunReport};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new(config.log_level.clone())),
        )
        .init();

    info!("gateway verifier is starting...");

    let management = ManagementClient::new(&config);
    let session = VerificationSession::new(&config, &management).await?;
    let minter = TokenMinter::new(&config.cli_dir);

    let mut report = RunReport::new();

    let outcome = session.check_with_api_key(Some(StatusCode::OK)).await?;
    report.record(CredentialKind::ApiKey, outcome);

    let outcome = session
        .check_with_token(&minter, Some(StatusCode::OK))
        .await?;
    report.record(CredentialKind::Bearer, outcome);

    let quota_report = if config.local_quota {
        session
            .run_local_quota_scenario(&management, config.quota_limit)
            .await?
    } else {
        session.run_quota_scenario(config.quota_limit).await?
    };
    report.merge(quota_report);

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.passed() {
        error!(
            "verification finished with {} failed checks",
            report.failures().len()
        );
        std::process::exit(1);
    }

    info!("all checks passed");
    Ok(())
}
