use std::env;
use std::path::PathBuf;
use std::time::Duration;

use color_eyre::{Result, eyre::WrapErr};

const DEFAULT_ENDPOINT_URL: &str = "http://localhost:8080/httpbin/headers";
const DEFAULT_MANAGEMENT_URL: &str = "http://localhost:8080/management";

/// Runtime configuration, built once in main and passed by reference.
///
/// The three wait durations straddle the gateway's quota-accounting window,
/// which is a property of the deployed environment, not of this tool. Override
/// them through the environment when testing against a gateway with a
/// different window.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint_url: String,
    pub management_url: String,
    pub org: String,
    pub env: String,
    pub cli_dir: PathBuf,
    pub quota_limit: u32,
    pub local_quota: bool,
    pub request_timeout: Duration,
    pub retry_min_interval: Duration,
    pub retry_max_interval: Duration,
    pub settle_wait: Duration,
    pub quota_reset_wait: Duration,
    pub proxy_transition_wait: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            endpoint_url: env_or("TARGET_URL", DEFAULT_ENDPOINT_URL),
            management_url: env_or("MANAGEMENT_URL", DEFAULT_MANAGEMENT_URL),
            org: env::var("ORG").wrap_err("ORG must be set")?,
            env: env::var("ENV").wrap_err("ENV must be set")?,
            cli_dir: PathBuf::from(env_or("CLI_DIR", ".")),
            quota_limit: parse_env("QUOTA_LIMIT", 5)?,
            local_quota: env::var("LOCAL_QUOTA")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            request_timeout: Duration::from_secs(parse_env("REQUEST_TIMEOUT_SECS", 15)?),
            retry_min_interval: Duration::from_millis(parse_env("RETRY_MIN_INTERVAL_MS", 1000)?),
            retry_max_interval: Duration::from_millis(parse_env("RETRY_MAX_INTERVAL_MS", 5000)?),
            settle_wait: Duration::from_secs(parse_env("SETTLE_WAIT_SECS", 1)?),
            quota_reset_wait: Duration::from_secs(parse_env("QUOTA_RESET_WAIT_SECS", 62)?),
            proxy_transition_wait: Duration::from_secs(parse_env("PROXY_TRANSITION_WAIT_SECS", 5)?),
            log_level: env_or("LOG_LEVEL", "info"),
        })
    }

    /// Test constructor: mock server URLs, zero waits so scenarios run instantly.
    pub fn new_for_test(endpoint_url: String, management_url: String) -> Self {
        Self {
            endpoint_url,
            management_url,
            org: "test-org".to_string(),
            env: "test-env".to_string(),
            cli_dir: PathBuf::from("."),
            quota_limit: 5,
            local_quota: false,
            request_timeout: Duration::from_secs(15),
            retry_min_interval: Duration::from_millis(50),
            retry_max_interval: Duration::from_millis(100),
            settle_wait: Duration::ZERO,
            quota_reset_wait: Duration::ZERO,
            proxy_transition_wait: Duration::ZERO,
            log_level: "debug".to_string(),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .wrap_err_with(|| format!("invalid value for {name}: {raw}")),
        Err(_) => Ok(default),
    }
}
