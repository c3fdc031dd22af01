use color_eyre::{Result, eyre::WrapErr};
use reqwest::{Client, StatusCode};
use tracing::{debug, error};

use crate::config::Config;
use crate::http_client::build_client;
use crate::management::ManagementApi;
use crate::token::TokenMinter;
use crate::types::{CheckOutcome, CredentialKind, Credentials, RunReport};

/// One verification session against a fixed gateway endpoint. Credentials are
/// fetched on construction, so a session that exists is always ready to check.
pub struct VerificationSession<'a> {
    config: &'a Config,
    credentials: Credentials,
    client: Client,
}

impl<'a> VerificationSession<'a> {
    pub async fn new(config: &'a Config, management: &dyn ManagementApi) -> Result<Self> {
        let credentials = management
            .fetch_credentials()
            .await
            .wrap_err("failed to fetch credentials")?;
        let client = build_client(config)?;

        Ok(Self {
            config,
            credentials,
            client,
        })
    }

    /// GET the endpoint with `x-api-key` and classify the status code.
    /// Transport errors propagate; mismatches do not.
    pub async fn check_with_api_key(&self, expect: Option<StatusCode>) -> Result<CheckOutcome> {
        let response = self
            .client
            .get(&self.config.endpoint_url)
            .header("x-api-key", &self.credentials.key)
            .send()
            .await?;

        Ok(classify_and_log(
            CredentialKind::ApiKey,
            response.status(),
            expect,
        ))
    }

    /// Mint a token through the CLI, then GET the endpoint with
    /// `Authorization: Bearer <token>`. Minting failures are hard errors and
    /// no request is sent.
    pub async fn check_with_token(
        &self,
        minter: &TokenMinter,
        expect: Option<StatusCode>,
    ) -> Result<CheckOutcome> {
        let token = minter.mint(self.config, &self.credentials).await?;

        let response = self
            .client
            .get(&self.config.endpoint_url)
            .bearer_auth(&token)
            .send()
            .await?;

        Ok(classify_and_log(
            CredentialKind::Bearer,
            response.status(),
            expect,
        ))
    }

    /// Consume the quota with informational checks, expect an over-limit
    /// rejection, then expect a success after the reset window. The waits come
    /// from config because they track the remote gateway's accounting window.
    pub async fn run_quota_scenario(&self, quota: u32) -> Result<RunReport> {
        let mut report = RunReport::new();

        for _ in 0..quota {
            let outcome = self.check_with_api_key(None).await?;
            report.record(CredentialKind::ApiKey, outcome);
        }

        tokio::time::sleep(self.config.settle_wait).await;

        debug!("expecting this call to fail for quota depletion...");
        let outcome = self.check_with_api_key(Some(StatusCode::FORBIDDEN)).await?;
        report.record(CredentialKind::ApiKey, outcome);

        debug!("waiting for quota to be restored. this takes about a minute...");
        tokio::time::sleep(self.config.quota_reset_wait).await;

        debug!("expecting this call to succeed with restored quota...");
        let outcome = self.check_with_api_key(Some(StatusCode::OK)).await?;
        report.record(CredentialKind::ApiKey, outcome);

        Ok(report)
    }

    /// Quota scenario with the remote enforcement proxy taken offline, so only
    /// client-local enforcement is in play. Undeploy failures are logged and
    /// the scenario proceeds; re-deploy is attempted on every exit path so the
    /// environment is not left degraded for later runs.
    pub async fn run_local_quota_scenario(
        &self,
        management: &dyn ManagementApi,
        quota: u32,
    ) -> Result<RunReport> {
        debug!("turning the enforcement proxy offline...");
        match management.undeploy_proxy().await {
            Ok(response) if !response.ok => {
                error!("turning the enforcement proxy offline failed");
                error!("{}", response.content);
            }
            Ok(_) => {}
            Err(e) => error!("{e:#}"),
        }

        tokio::time::sleep(self.config.proxy_transition_wait).await;

        debug!("performing local quota test...");
        let result = self.run_quota_scenario(quota).await;

        debug!("turning the enforcement proxy back on...");
        match management.deploy_proxy().await {
            Ok(response) if !response.ok => {
                error!("turning the enforcement proxy back on failed");
                error!("{}", response.content);
            }
            Ok(_) => {}
            Err(e) => error!("{e:#}"),
        }

        result
    }
}

fn classify_and_log(
    kind: CredentialKind,
    observed: StatusCode,
    expect: Option<StatusCode>,
) -> CheckOutcome {
    let outcome = CheckOutcome::classify(observed, expect);
    match outcome {
        CheckOutcome::Informational { status } => {
            debug!("call using {kind} got response code {status}");
        }
        CheckOutcome::Passed { status } => {
            debug!("call using {kind} got response code {status} as expected");
        }
        CheckOutcome::Mismatch { expected, observed } => {
            error!("failed to test target service using {kind}, expected {expected} got {observed}");
        }
    }
    outcome
}
