// ── Core error types ──
//
// Operation-level errors from vdirect-core. Status codes are classified
// here; raw transport errors from `vdirect_api` are folded into the same
// taxonomy by the `From` impl below. Every variant renders a human-readable
// message, and `detail()` exposes the service's diagnostic body when one
// was received.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to vDirect at {url}: {reason}")]
    Connectivity { url: String, reason: String },

    #[error("vDirect version {actual} is not supported (minimum {minimum})")]
    UnsupportedVersion { actual: String, minimum: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Schema / validation errors ───────────────────────────────────
    #[error("Schema error: {message}")]
    Schema {
        message: String,
        detail: Option<String>,
    },

    #[error("Invalid parameters: {message}")]
    InvalidParameters {
        message: String,
        detail: Option<String>,
    },

    // ── Resource errors ──────────────────────────────────────────────
    #[error("{entity_type} ({identifier}) not found")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("{entity_type} ({identifier}) already exists")]
    Conflict {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("{operation} is not supported for device type {device_type}")]
    Unsupported {
        operation: String,
        device_type: String,
    },

    #[error("{message}")]
    OperationFailed {
        message: String,
        log: Vec<String>,
        duration: Option<f64>,
    },

    /// Any response the operation has no classification for.
    #[error("{message}")]
    Service {
        message: String,
        status: Option<u16>,
        body: Option<String>,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("{message}: {path}")]
    LocalIo { path: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl CoreError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
            detail: None,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
            detail: None,
        }
    }

    /// Diagnostic text returned by the service, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Schema { detail, .. } | Self::InvalidParameters { detail, .. } => {
                detail.as_deref()
            }
            Self::Service { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// HTTP status that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => *status,
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<vdirect_api::Error> for CoreError {
    fn from(err: vdirect_api::Error) -> Self {
        match err {
            vdirect_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() || e.is_request() {
                    CoreError::Connectivity {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Service {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                        body: None,
                    }
                }
            }
            vdirect_api::Error::InvalidUrl(e) => CoreError::Configuration {
                message: format!("Invalid URL: {e}"),
            },
            vdirect_api::Error::Tls(msg) => CoreError::Connectivity {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            vdirect_api::Error::Api {
                status,
                message,
                body,
            } => CoreError::Service {
                message: format!("{message} [{status}]"),
                status: Some(status),
                body: Some(body),
            },
            vdirect_api::Error::Serialization(e) => CoreError::Service {
                message: format!("failed to encode request: {e}"),
                status: None,
                body: None,
            },
            vdirect_api::Error::Deserialization { message, body } => CoreError::Service {
                message: format!("unexpected response from vDirect: {message}"),
                status: None,
                body: Some(body),
            },
        }
    }
}
