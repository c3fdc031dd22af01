/// lib exports for integration testing
/// separated so the tests drive the same path as the binary: session -> http -> gateway
pub mod config;
pub mod http_client;
pub mod management;
pub mod session;
pub mod token;
pub mod types;
pub mod utils;

pub use types::{CheckOutcome, CheckRecord, CredentialKind, Credentials, RunReport};
