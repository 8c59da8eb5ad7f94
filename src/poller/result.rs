// src/poller/result.rs
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified outcome of a single endpoint check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Up,
    Redirect,
    ClientError,
    ServerError,
    Timeout,
    ConnectionError,
    Error,
    Unknown,
}

impl CheckStatus {
    /// Map an HTTP status code onto a status. Only an exact 200 is `Up`.
    pub fn from_status_code(code: u16) -> Self {
        match code {
            200 => CheckStatus::Up,
            300..=399 => CheckStatus::Redirect,
            400..=499 => CheckStatus::ClientError,
            500..=599 => CheckStatus::ServerError,
            _ => CheckStatus::Unknown,
        }
    }

    /// Redirects count as healthy for the process exit code.
    pub fn is_healthy(&self) -> bool {
        matches!(self, CheckStatus::Up | CheckStatus::Redirect)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Up => "up",
            CheckStatus::Redirect => "redirect",
            CheckStatus::ClientError => "client_error",
            CheckStatus::ServerError => "server_error",
            CheckStatus::Timeout => "timeout",
            CheckStatus::ConnectionError => "connection_error",
            CheckStatus::Error => "error",
            CheckStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a check produced no HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Failed to connect to the server")]
    Connection,

    #[error("{0}")]
    Request(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl CheckError {
    /// Sort a reqwest failure into the check taxonomy.
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            CheckError::Timeout(timeout_secs)
        } else if err.is_connect() {
            CheckError::Connection
        } else {
            CheckError::Request(err.to_string())
        }
    }

    pub fn status(&self) -> CheckStatus {
        match self {
            CheckError::Timeout(_) => CheckStatus::Timeout,
            CheckError::Connection => CheckStatus::ConnectionError,
            CheckError::Request(_) | CheckError::Unexpected(_) => CheckStatus::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub url: String,
    pub status: CheckStatus,
    pub status_code: Option<u16>,
    #[serde(alias = "response_time")]
    pub response_time_ms: Option<f64>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl CheckResult {
    pub fn from_response(name: &str, url: &str, status_code: u16, response_time_ms: f64) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            status: CheckStatus::from_status_code(status_code),
            status_code: Some(status_code),
            response_time_ms: Some(response_time_ms),
            error: None,
            timestamp: now_iso8601(),
        }
    }

    pub fn from_error(name: &str, url: &str, error: &CheckError) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            status: error.status(),
            status_code: None,
            response_time_ms: None,
            error: Some(error.to_string()),
            timestamp: now_iso8601(),
        }
    }

    /// Stand-in for a check whose worker task never produced a result.
    pub fn dispatch_failure(name: &str, url: &str, reason: impl fmt::Display) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            status: CheckStatus::Error,
            status_code: None,
            response_time_ms: None,
            error: Some(format!("Future execution error: {}", reason)),
            timestamp: now_iso8601(),
        }
    }

    /// Stamp the result with the moment its check started.
    pub fn started_at(mut self, timestamp: String) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }
}

/// Number of results that are neither up nor redirecting.
pub fn failed_count(results: &[CheckResult]) -> usize {
    results.iter().filter(|r| !r.is_healthy()).count()
}

/// Process exit status for a run: the failed count, saturating at 255.
pub fn exit_code(results: &[CheckResult]) -> u8 {
    u8::try_from(failed_count(results)).unwrap_or(u8::MAX)
}

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub(crate) fn now_iso8601() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Milliseconds rounded to two decimal places.
pub(crate) fn round_ms(elapsed: std::time::Duration) -> f64 {
    (elapsed.as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}
