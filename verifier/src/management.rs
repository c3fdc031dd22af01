use async_trait::async_trait;
use color_eyre::{Result, eyre::eyre};
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, warn};

use crate::config::Config;
use crate::types::Credentials;
use crate::utils::build_reqwest_retry_client;

/// Outcome of a proxy deploy/undeploy call. A not-ok response is diagnostic
/// material for the caller, not an error.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub ok: bool,
    pub content: String,
}

/// Gateway management API: credential fetch and enforcement-proxy lifecycle.
#[async_trait]
pub trait ManagementApi {
    async fn fetch_credentials(&self) -> Result<Credentials>;
    async fn undeploy_proxy(&self) -> Result<ProxyResponse>;
    async fn deploy_proxy(&self) -> Result<ProxyResponse>;
}

#[derive(Clone)]
pub struct ManagementClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl ManagementClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: build_reqwest_retry_client(
                config.retry_min_interval,
                config.retry_max_interval,
            ),
            base_url: config.management_url.clone(),
        }
    }

    async fn set_proxy_state(&self, action: &str) -> Result<ProxyResponse> {
        debug!("requesting proxy {action}");

        let response = self
            .client
            .post(format!("{}/proxies/{action}", self.base_url))
            .send()
            .await?;

        let ok = response.status().is_success();
        let status = response.status();
        let content = response.text().await.unwrap_or_default();
        if !ok {
            warn!("proxy {action} returned {status} - {content}");
        }

        Ok(ProxyResponse { ok, content })
    }
}

#[async_trait]
impl ManagementApi for ManagementClient {
    async fn fetch_credentials(&self) -> Result<Credentials> {
        debug!("fetching credentials from {}", self.base_url);

        let response = self
            .client
            .get(format!("{}/credentials", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(eyre!("credential fetch failed: {status} - {body}"));
        }

        let creds: Credentials = response.json().await?;
        Credentials::new(creds.key, creds.secret)
    }

    async fn undeploy_proxy(&self) -> Result<ProxyResponse> {
        self.set_proxy_state("undeploy").await
    }

    async fn deploy_proxy(&self) -> Result<ProxyResponse> {
        self.set_proxy_state("deploy").await
    }
}
