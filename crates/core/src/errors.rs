use thiserror::Error;

/// Maximum number of characters of a response body kept for diagnostics.
pub const BODY_PREVIEW_LIMIT: usize = 200;

/// Unified error type for the entire trade-dashboard-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    // ── Transport ───────────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} {status_text}: {body_preview}")]
    Http {
        status: u16,
        status_text: String,
        body_preview: String,
    },

    #[error("Malformed response body: {body_preview}")]
    Parse { body_preview: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Data shape / user input ─────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    UserInput(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CoreError {
    /// Build an `Http` error, truncating the body to the preview limit.
    pub fn http(status: u16, status_text: impl Into<String>, body: &str) -> Self {
        CoreError::Http {
            status,
            status_text: status_text.into(),
            body_preview: body_preview(body),
        }
    }

    /// Build a `Parse` error, truncating the body to the preview limit.
    pub fn parse(body: &str) -> Self {
        CoreError::Parse {
            body_preview: body_preview(body),
        }
    }

    /// Only input errors are shown to the user; everything else is logged and swallowed.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(self, CoreError::UserInput(_))
    }
}

/// First `BODY_PREVIEW_LIMIT` characters of `body` (char-boundary safe).
pub fn body_preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_LIMIT) {
        Some((idx, _)) => body[..idx].to_string(),
        None => body.to_string(),
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Query strings may carry credentials; never let them reach the logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
