//! Log Sources
//!
//! Where raw events come from: the collection layer's HTTP endpoint or the
//! exported JSON log file. Both normalize through the same payload parser;
//! transport failures surface as [`SourceError`] to the poller.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::events::{parse_logs_payload, SysmonEvent};
use crate::constants::HTTP_TIMEOUT_SECS;

// ============================================================================
// ERRORS
// ============================================================================

/// Transport-level failures while fetching logs
#[derive(Debug)]
pub enum SourceError {
    Network(String),
    Server(u16),
    Parse(String),
    Io(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "Network error: {}", e),
            Self::Server(code) => write!(f, "Server error: {}", code),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for SourceError {}

// ============================================================================
// SOURCE TRAIT
// ============================================================================

/// A pluggable provider of raw event snapshots
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Fetch the current raw event snapshot.
    ///
    /// A reachable source with a malformed or empty payload yields an empty
    /// sequence; only transport failures are errors.
    async fn fetch_logs(&self) -> Result<Vec<SysmonEvent>, SourceError>;
}

/// The collection layer wraps events as `{ "logs": ... }`; tolerate both
/// the envelope and a bare payload.
fn unwrap_logs_envelope(body: &Value) -> &Value {
    match body.get("logs") {
        Some(logs) => logs,
        None => body,
    }
}

// ============================================================================
// HTTP SOURCE
// ============================================================================

/// Fetches the `logs` payload from the collection layer over HTTP
pub struct HttpLogSource {
    url: String,
    client: reqwest::Client,
}

impl HttpLogSource {
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self { url: url.into(), client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LogSource for HttpLogSource {
    async fn fetch_logs(&self) -> Result<Vec<SysmonEvent>, SourceError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Server(response.status().as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(parse_logs_payload(unwrap_logs_envelope(&body)))
    }
}

// ============================================================================
// FILE SOURCE
// ============================================================================

/// Reads the exported Sysmon log file directly
pub struct FileLogSource {
    path: PathBuf,
}

impl FileLogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl LogSource for FileLogSource {
    async fn fetch_logs(&self) -> Result<Vec<SysmonEvent>, SourceError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Io(format!("{}: {}", self.path.display(), e)))?;

        match serde_json::from_str::<Value>(&contents) {
            Ok(body) => Ok(parse_logs_payload(unwrap_logs_envelope(&body))),
            Err(e) => {
                log::warn!("Malformed log file {}: {}", self.path.display(), e);
                Ok(Vec::new())
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
