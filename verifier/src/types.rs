use std::fmt;

use chrono::{DateTime, Utc};
use color_eyre::{Result, eyre::eyre};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API key and shared secret, fetched once at session start.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let secret = secret.into();
        if key.is_empty() || secret.is_empty() {
            return Err(eyre!("credentials must have a non-empty key and secret"));
        }
        Ok(Self { key, secret })
    }
}

// keep the secret out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CredentialKind {
    ApiKey,
    Bearer,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CredentialKind::ApiKey => "API key",
            CredentialKind::Bearer => "bearer token",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of a single check. Mismatches are values, not errors, so a run
/// always completes and the caller decides what a failure means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckOutcome {
    Passed { status: u16 },
    Mismatch { expected: u16, observed: u16 },
    Informational { status: u16 },
}

impl CheckOutcome {
    /// Classify an observed status against an optional expectation. With no
    /// expectation the status is recorded as-is and no comparison occurs.
    pub fn classify(observed: StatusCode, expected: Option<StatusCode>) -> Self {
        match expected {
            None => CheckOutcome::Informational {
                status: observed.as_u16(),
            },
            Some(e) if observed == e => CheckOutcome::Passed {
                status: observed.as_u16(),
            },
            Some(e) => CheckOutcome::Mismatch {
                expected: e.as_u16(),
                observed: observed.as_u16(),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CheckOutcome::Mismatch { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckRecord {
    pub credential: CredentialKind,
    pub outcome: CheckOutcome,
    pub checked_at: DateTime<Utc>,
}

/// Structured record of a verification run, the machine-readable replacement
/// for grepping log output.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub records: Vec<CheckRecord>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            records: Vec::new(),
        }
    }

    pub fn record(&mut self, credential: CredentialKind, outcome: CheckOutcome) {
        self.records.push(CheckRecord {
            credential,
            outcome,
            checked_at: Utc::now(),
        });
    }

    pub fn merge(&mut self, other: RunReport) {
        self.records.extend(other.records);
    }

    pub fn failures(&self) -> Vec<&CheckRecord> {
        self.records
            .iter()
            .filter(|r| r.outcome.is_failure())
            .collect()
    }

    pub fn passed(&self) -> bool {
        self.failures().is_empty()
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
