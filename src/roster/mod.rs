use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const DEFAULT_ROSTER_URL: &str = "https://dvonb.xyz/api/2025-fall/itis-3135/students?full=1";

const USER_AGENT: &str = concat!("introviewer/", env!("CARGO_PKG_VERSION"));

const STATUS_MESSAGE: &str = "Unable to load students right now.";
const FALLBACK_MESSAGE: &str = "Failed to fetch students.";

/// One student entry exactly as the upstream API returned it.
///
/// The upstream schema has shifted between iterations, so nothing about the
/// shape is assumed here. Lookups on a non-object value simply find nothing.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RawStudentRecord(Value);

impl RawStudentRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Looks up `parent.child`, e.g. `name.first`.
    pub fn get_nested(&self, parent: &str, child: &str) -> Option<&Value> {
        self.0.get(parent).and_then(|p| p.get(child))
    }
}

impl From<Value> for RawStudentRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("roster request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    #[error("roster endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("roster body is not valid JSON: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The single line shown to the user when a page lands in the error state.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Status { .. } => STATUS_MESSAGE.to_string(),
            other => {
                let text = other.to_string();
                if text.trim().is_empty() {
                    FALLBACK_MESSAGE.to_string()
                } else {
                    text
                }
            }
        }
    }
}

/// Turns a response body into a roster. Anything other than a JSON array is an
/// empty roster rather than an error.
pub fn parse_roster(body: &str) -> Result<Vec<RawStudentRecord>, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|source| FetchError::Decode { source })?;
    match value {
        Value::Array(items) => Ok(items.into_iter().map(RawStudentRecord::from).collect()),
        other => {
            tracing::debug!(kind = json_kind(&other), "roster body is not an array");
            Ok(Vec::new())
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Clone, Debug)]
pub struct RosterClient {
    client: reqwest::Client,
    url: String,
}

impl RosterClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::ClientBuild { source })?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issues the one GET for this page view. No retries.
    pub async fn fetch(&self) -> Result<Vec<RawStudentRecord>, FetchError> {
        tracing::debug!(url = %self.url, "fetching roster");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| FetchError::Transport { source })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, status = status.as_u16(), "roster fetch rejected");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport { source })?;
        let roster = parse_roster(&body)?;
        tracing::info!(url = %self.url, records = roster.len(), "roster loaded");
        Ok(roster)
    }
}
