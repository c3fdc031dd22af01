#![allow(dead_code)]

use verifier::config::Config;
use verifier::management::ManagementClient;
use verifier::session::VerificationSession;

use super::mock_servers::MockGatewayServices;

pub struct TestContext {
    pub mocks: MockGatewayServices,
    pub config: Config,
    pub management: ManagementClient,
}

impl TestContext {
    pub async fn new() -> Self {
        let mocks = MockGatewayServices::start().await;
        let config = Config::new_for_test(mocks.endpoint_url(), mocks.management_url());
        let management = ManagementClient::new(&config);

        Self {
            mocks,
            config,
            management,
        }
    }

    /// Session with credentials already served by the management mock.
    pub async fn session(&self) -> VerificationSession<'_> {
        VerificationSession::new(&self.config, &self.management)
            .await
            .expect("session setup failed")
    }
}
