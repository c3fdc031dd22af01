mod reqwest_retry;

pub use reqwest_retry::build_reqwest_retry_client;
