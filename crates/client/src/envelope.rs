//! The uniform response envelope every backend endpoint uses.

use serde::Deserialize;

/// The sole status value that marks a successful response.
pub const STATUS_OK: &str = "ok";

/// Uniform `{status, message, data}` wrapper around every JSON response.
///
/// `status` is the only success marker; any other value is a rejection.
/// `message` carries the backend's human-readable reason on rejection and
/// is surfaced for logging. `data` holds the operation payload and is
/// decoded per operation after the status check.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl Envelope {
    /// Whether the backend acknowledged the request.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}
