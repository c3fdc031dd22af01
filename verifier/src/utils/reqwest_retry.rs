use std::time::Duration;

use http::Extensions;
use reqwest::{Client, Request, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware, Next};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use retry_policies::Jitter;
use tracing::Instrument;

/// Add context to tracing spans for management API requests.
pub struct ManagementRequestLogger;

#[async_trait::async_trait]
impl Middleware for ManagementRequestLogger {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let url = req.url().to_string();
        let method = req.method().as_str();
        let service = req.url().host_str().unwrap_or("unknown");

        let span = tracing::warn_span!(
            "management_request",
            method = %method,
            url = %url,
            service = %service
        );

        async move { next.run(req, extensions).await }
            .instrument(span)
            .await
    }
}

/// Retrying client for the management API only. Probe requests against the
/// gateway endpoint must never go through this: retries would consume quota.
/// The retry bounds come from `Config::retry_min_interval` / `retry_max_interval`.
pub fn build_reqwest_retry_client(
    min_retry_interval: Duration,
    max_retry_interval: Duration,
) -> ClientWithMiddleware {
    let retry_policy = ExponentialBackoff::builder()
        .jitter(Jitter::None)
        .base(2)
        .retry_bounds(min_retry_interval, max_retry_interval)
        .build_with_max_retries(3);

    ClientBuilder::new(Client::new())
        .with(ManagementRequestLogger) // Add context before retry middleware
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
}
