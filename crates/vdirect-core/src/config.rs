// ── Runtime connection configuration ──
//
// These types describe *how* to reach a vDirect server and which device an
// operation targets. They carry credential data and connection tuning, but
// never touch disk. The CLI constructs a `ClientConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::family::DeviceFamily;
use crate::version::MIN_SUPPORTED_VERSION;

/// Default vDirect REST port.
pub const DEFAULT_PORT: u16 = 2189;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// URL scheme used to reach vDirect.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for connecting to a vDirect server (or HA pair).
///
/// Built by the CLI, passed to [`Session::establish`](crate::Session::establish).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Primary vDirect address (host or IP).
    pub primary: String,
    /// Secondary vDirect address of an HA pair.
    pub secondary: Option<String>,
    pub port: u16,
    pub scheme: Scheme,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Lowest accepted service version, dotted numeric.
    pub min_version: String,
}

impl ClientConfig {
    /// Config with defaults for everything but address and credentials.
    pub fn new(primary: impl Into<String>, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            primary: primary.into(),
            secondary: None,
            port: DEFAULT_PORT,
            scheme: Scheme::default(),
            username: username.into(),
            password,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            min_version: MIN_SUPPORTED_VERSION.into(),
        }
    }
}

/// The managed device an operation is executed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTarget {
    pub family: DeviceFamily,
    /// Device name as registered in vDirect.
    pub name: String,
}

impl DeviceTarget {
    pub fn new(family: DeviceFamily, name: impl Into<String>) -> Self {
        Self {
            family,
            name: name.into(),
        }
    }
}
