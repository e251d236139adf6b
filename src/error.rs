use thiserror::Error;

/// Main error type for the prediction client
#[derive(Error, Debug)]
pub enum PickwiseError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Credential acquisition errors
    #[error("Credential error: {0}")]
    Credential(String),

    // Network errors (transport failures and non-2xx responses)
    #[error("{context} failed{}", status_suffix(.status))]
    RequestFailed {
        context: String,
        status: Option<u16>,
        body: Option<String>,
    },

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Service returned data that breaks its own invariants
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(": status={}", s)).unwrap_or_default()
}

/// Result type alias for PickwiseError
pub type Result<T> = std::result::Result<T, PickwiseError>;

impl PickwiseError {
    /// HTTP status of a failed request, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            PickwiseError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Human-readable `detail` field from a JSON error body.
    ///
    /// Only string details are returned; structured validation payloads are ignored.
    pub fn detail(&self) -> Option<String> {
        let PickwiseError::RequestFailed {
            body: Some(body), ..
        } = self
        else {
            return None;
        };

        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("detail")
            .and_then(|d| d.as_str())
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    }

    /// Text to show a user: the server detail when present, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            PickwiseError::RequestFailed { .. } => {
                self.detail().unwrap_or_else(|| fallback.to_string())
            }
            PickwiseError::DataIntegrity(msg) => msg.clone(),
            _ => fallback.to_string(),
        }
    }
}
