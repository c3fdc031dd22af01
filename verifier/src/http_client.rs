use crate::config::Config;
use reqwest::Client;

/// Probe client for the gateway endpoint. No retry middleware here: a retried
/// probe would consume quota and skew the scenario counts.
pub fn build_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(config.request_timeout).build()
}
