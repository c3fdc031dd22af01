use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use color_eyre::{Result, eyre::eyre};
use pretty_assertions::assert_eq;

use crate::common::*;
use verifier::config::Config;
use verifier::management::{ManagementApi, ProxyResponse};
use verifier::session::VerificationSession;
use verifier::types::Credentials;

#[tokio::test]
async fn test_local_quota_toggles_proxy_around_scenario() {
    let quota = 3;
    let ctx = TestContext::new().await;
    ctx.mocks.setup_credentials_mock().await;
    ctx.mocks.setup_quota_window(quota as u64).await;
    ctx.mocks.setup_proxy_mocks(200, 200).await;

    let session = ctx.session().await;
    let report = session
        .run_local_quota_scenario(&ctx.management, quota)
        .await
        .unwrap();

    assert_eq!(report.records.len(), quota as usize + 2);
    assert!(report.passed());

    // deploy mock carries expect(1); verify it was hit exactly once
    ctx.mocks.management.verify().await;
}

#[tokio::test]
async fn test_local_quota_proceeds_when_undeploy_rejected() {
    let quota = 2;
    let ctx = TestContext::new().await;
    ctx.mocks.setup_credentials_mock().await;
    ctx.mocks.setup_quota_window(quota as u64).await;
    // 404 on undeploy: logged, not fatal
    ctx.mocks.setup_proxy_mocks(404, 200).await;

    let session = ctx.session().await;
    let report = session
        .run_local_quota_scenario(&ctx.management, quota)
        .await
        .unwrap();

    assert_eq!(report.records.len(), quota as usize + 2);
    ctx.mocks.management.verify().await;
}

/// Management stub whose undeploy always errors, for exercising the
/// best-effort cleanup path without a network.
struct BrokenUndeployManagement {
    deploy_calls: AtomicUsize,
}

impl BrokenUndeployManagement {
    fn new() -> Self {
        Self {
            deploy_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ManagementApi for BrokenUndeployManagement {
    async fn fetch_credentials(&self) -> Result<Credentials> {
        Credentials::new(TEST_API_KEY, TEST_API_SECRET)
    }

    async fn undeploy_proxy(&self) -> Result<ProxyResponse> {
        Err(eyre!("management API unreachable"))
    }

    async fn deploy_proxy(&self) -> Result<ProxyResponse> {
        self.deploy_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ProxyResponse {
            ok: true,
            content: String::new(),
        })
    }
}

#[tokio::test]
async fn test_local_quota_redeploys_exactly_once_after_undeploy_error() {
    let quota = 2;
    let ctx = TestContext::new().await;
    ctx.mocks.setup_credentials_mock().await;
    ctx.mocks.setup_quota_window(quota as u64).await;

    let management = BrokenUndeployManagement::new();
    let session = ctx.session().await;
    let report = session
        .run_local_quota_scenario(&management, quota)
        .await
        .unwrap();

    assert_eq!(report.records.len(), quota as usize + 2);
    assert_eq!(management.deploy_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_local_quota_redeploys_exactly_once_when_scenario_errors() {
    // nothing listens on port 1, so the first informational check fails with a
    // transport error and the quota scenario propagates it
    let config = Config::new_for_test(
        "http://127.0.0.1:1/httpbin/headers".to_string(),
        String::new(),
    );
    let management = BrokenUndeployManagement::new();
    let session = VerificationSession::new(&config, &management)
        .await
        .unwrap();

    let result = session.run_local_quota_scenario(&management, 3).await;

    // the scenario error surfaces, but the proxy was still re-deployed first
    assert!(result.is_err());
    assert_eq!(management.deploy_calls.load(Ordering::SeqCst), 1);
}
