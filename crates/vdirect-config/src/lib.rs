//! Shared configuration for vDirect tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `vdirect_core::ClientConfig`. The CLI layers its
//! flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use vdirect_core::{
    ClientConfig, DEFAULT_PORT, DeviceFamily, DeviceTarget, MIN_SUPPORTED_VERSION, Scheme,
    TlsVerification,
};

/// Keyring service name for stored passwords.
pub const KEYRING_SERVICE: &str = "vdirect";

/// Environment variable consulted for the password of any profile.
pub const PASSWORD_ENV: &str = "VDIRECT_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in {path}")]
    UnknownProfile { name: String, path: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named vDirect profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.into(),
                path: config_path().display().to_string(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_validate_certs")]
    pub validate_certs: bool,

    /// Seconds between status polls of asynchronous operations.
    #[serde(default = "default_async_delay")]
    pub async_delay: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            validate_certs: default_validate_certs(),
            async_delay: default_async_delay(),
        }
    }
}

fn default_output() -> String {
    "json".into()
}
fn default_timeout() -> u64 {
    180
}
fn default_validate_certs() -> bool {
    true
}
fn default_async_delay() -> u64 {
    2
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

/// A named vDirect server (or HA pair) profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Primary vDirect address.
    pub vdirect_ip: String,

    /// Secondary vDirect address of an HA pair.
    pub secondary_vdirect_ip: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub scheme: Scheme,

    pub username: Option<String>,

    /// Password (plaintext, prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override certificate validation.
    pub validate_certs: Option<bool>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Device family: "alteon", "defensepro" or "appwall".
    pub device_type: Option<String>,

    /// Device name as registered in vDirect.
    pub device_name: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            vdirect_ip: String::new(),
            secondary_vdirect_ip: None,
            port: DEFAULT_PORT,
            scheme: Scheme::default(),
            username: None,
            password: None,
            password_env: None,
            timeout: None,
            validate_certs: None,
            ca_cert: None,
            device_type: None,
            device_name: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "vdirect", "vdirect").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("vdirect");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// Nested keys are addressed with a double underscore, e.g.
/// `VDIRECT_DEFAULTS__TIMEOUT=60`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VDIRECT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

/// Resolve the username: profile, then `VDIRECT_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var("VDIRECT_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the password from the credential chain (no CLI flag step).
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Shared env var
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

// ── Translation to core types ───────────────────────────────────────

/// Build a `ClientConfig` from a profile, with `password` already resolved.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    password: SecretString,
) -> Result<ClientConfig, ConfigError> {
    if profile.vdirect_ip.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "vdirect_ip".into(),
            reason: format!("profile '{profile_name}' has no vDirect address"),
        });
    }

    let validate_certs = profile.validate_certs.unwrap_or(defaults.validate_certs);
    let tls = match (&profile.ca_cert, validate_certs) {
        (_, false) => TlsVerification::DangerAcceptInvalid,
        (Some(ca_path), true) => TlsVerification::CustomCa(ca_path.clone()),
        (None, true) => TlsVerification::SystemDefaults,
    };

    Ok(ClientConfig {
        primary: profile.vdirect_ip.clone(),
        secondary: profile.secondary_vdirect_ip.clone(),
        port: profile.port,
        scheme: profile.scheme,
        username: resolve_username(profile, profile_name)?,
        password,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        min_version: MIN_SUPPORTED_VERSION.into(),
    })
}

/// Device target configured on a profile, if a device name is set.
pub fn profile_device_target(profile: &Profile) -> Result<Option<DeviceTarget>, ConfigError> {
    let Some(ref name) = profile.device_name else {
        return Ok(None);
    };
    let family = match profile.device_type.as_deref() {
        Some(raw) => parse_device_family(raw)?,
        None => DeviceFamily::default(),
    };
    Ok(Some(DeviceTarget::new(family, name.clone())))
}

/// Parse a device type name into a [`DeviceFamily`].
pub fn parse_device_family(raw: &str) -> Result<DeviceFamily, ConfigError> {
    DeviceFamily::parse(raw).map_err(|e| ConfigError::Validation {
        field: "device_type".into(),
        reason: e.to_string(),
    })
}
