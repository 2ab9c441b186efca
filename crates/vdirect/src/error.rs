//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use vdirect_config::ConfigError;
use vdirect_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to vDirect at {url}: {reason}")]
    #[diagnostic(
        code(vdirect::connection_failed),
        help(
            "Check that vDirect is running and reachable on the configured port.\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("vDirect version {actual} is not supported")]
    #[diagnostic(
        code(vdirect::unsupported_version),
        help("Upgrade vDirect to {minimum} or later.")
    )]
    UnsupportedVersion { actual: String, minimum: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(vdirect::timeout),
        help("Increase timeout with --timeout or check vDirect responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(vdirect::auth_failed),
        help(
            "Verify the username and password.\n\
             Run: vdirect config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(vdirect::no_credentials),
        help(
            "Configure credentials with: vdirect config init\n\
             Or set VDIRECT_USERNAME and VDIRECT_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(vdirect::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(
        code(vdirect::conflict),
        help("Pass --overwrite to replace an uploaded file.")
    )]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    // ── Schema / parameters ──────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(vdirect::schema))]
    Schema {
        message: String,
        #[help]
        detail: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(code(vdirect::invalid_parameters))]
    InvalidParameters {
        message: String,
        #[help]
        detail: Option<String>,
    },

    // ── Operations ───────────────────────────────────────────────────
    #[error("{operation} is not supported for {device_type} devices")]
    #[diagnostic(code(vdirect::unsupported))]
    Unsupported {
        operation: String,
        device_type: String,
    },

    #[error("{message}")]
    #[diagnostic(code(vdirect::operation_failed))]
    OperationFailed {
        message: String,
        #[help]
        log: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(code(vdirect::service))]
    Service {
        message: String,
        #[help]
        body: Option<String>,
    },

    #[error("No target device configured")]
    #[diagnostic(
        code(vdirect::no_device),
        help("Pass --device-name (-d) or set device_name in your profile.")
    )]
    NoDevice,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vdirect::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(vdirect::profile_not_found),
        help(
            "Create one with: vdirect config init\n\
             Config file: {path}"
        )
    )]
    ProfileNotFound { name: String, path: String },

    #[error("No vDirect address configured")]
    #[diagnostic(
        code(vdirect::no_config),
        help(
            "Create a profile with: vdirect config init\n\
             Or pass --vdirect-ip. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(vdirect::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error("{message}: {path}")]
    #[diagnostic(code(vdirect::local_io))]
    LocalIo { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(vdirect::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::UnsupportedVersion { .. } => {
                exit_code::CONNECTION
            }
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. }
            | Self::InvalidParameters { .. }
            | Self::NoDevice
            | Self::NoConfig { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Connectivity { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::UnsupportedVersion { actual, minimum } => {
                CliError::UnsupportedVersion { actual, minimum }
            }

            CoreError::Timeout { .. } => CliError::Timeout,

            CoreError::Schema { message, detail } => CliError::Schema { message, detail },

            CoreError::InvalidParameters { message, detail } => {
                CliError::InvalidParameters { message, detail }
            }

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                resource_type: entity_type,
                identifier,
            },

            CoreError::Conflict {
                entity_type,
                identifier,
            } => CliError::Conflict {
                resource_type: entity_type,
                identifier,
            },

            CoreError::Unsupported {
                operation,
                device_type,
            } => CliError::Unsupported {
                operation,
                device_type,
            },

            CoreError::OperationFailed {
                message,
                log,
                duration,
            } => {
                let mut lines = log;
                if let Some(secs) = duration {
                    lines.push(format!("duration: {secs}s"));
                }
                CliError::OperationFailed {
                    message,
                    log: (!lines.is_empty()).then(|| lines.join("\n")),
                }
            }

            CoreError::Service {
                status: Some(401),
                ..
            } => CliError::AuthFailed {
                profile: "current".into(),
            },

            CoreError::Service { message, body, .. } => CliError::Service { message, body },

            CoreError::LocalIo { path, message } => CliError::LocalIo { path, message },

            CoreError::Configuration { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name, path } => CliError::ProfileNotFound { name, path },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Keyring(e) => CliError::Validation {
                field: "keyring".into(),
                reason: e.to_string(),
            },
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
