/*
[INPUT]:  Sidecar response envelopes, health probes and lock file contents
[OUTPUT]: Typed response structs with serialization support
[POS]:    Data layer - type definitions for sidecar communication
[UPDATE]: When the sidecar envelope or lock file schema changes
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ success, data?, error? }` wrapper around every sidecar payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidecarResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SidecarErrorBody>,
}

impl SidecarResponse {
    /// Payload of a successful envelope, or the carried error message.
    pub fn into_data(self) -> Result<Value, String> {
        if self.success {
            return Ok(self.data.unwrap_or(Value::Null));
        }
        Err(self
            .error
            .map(|error| error.message())
            .unwrap_or_else(|| "Unknown error".to_string()))
    }
}

/// Sidecar errors arrive either as a bare string or as `{ message }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SidecarErrorBody {
    Text(String),
    Detail {
        #[serde(default)]
        message: Option<String>,
    },
}

impl SidecarErrorBody {
    pub fn message(&self) -> String {
        match self {
            SidecarErrorBody::Text(message) => message.clone(),
            SidecarErrorBody::Detail { message } => message
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Contents of the sidecar lock file written on startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerLockInfo {
    pub port: u16,
    pub pid: u32,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}
