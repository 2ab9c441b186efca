//! CLI configuration: thin wrapper around `vdirect_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--vdirect-ip, --username, --device-name, ...).

use std::time::Duration;

use secrecy::SecretString;

use vdirect_core::{ClientConfig, Completion, DeviceFamily, DeviceTarget, Scheme};

use crate::cli::{DeviceTypeArg, GlobalOpts, SchemeArg, SyncArgs};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use vdirect_config::{Config, Defaults, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// The active profile with CLI flag overrides applied.
///
/// Without a stored profile, flags alone must supply the vDirect address.
pub fn effective_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if global.vdirect_ip.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                path: config_path().display().to_string(),
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(ref ip) = global.vdirect_ip {
        profile.vdirect_ip.clone_from(ip);
    }
    if let Some(ref ip) = global.secondary_vdirect_ip {
        profile.secondary_vdirect_ip = Some(ip.clone());
    }
    if let Some(port) = global.port {
        profile.port = port;
    }
    if let Some(scheme) = global.scheme {
        profile.scheme = match scheme {
            SchemeArg::Http => Scheme::Http,
            SchemeArg::Https => Scheme::Https,
        };
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if global.insecure {
        profile.validate_certs = Some(false);
    }
    if let Some(ref device) = global.device_name {
        profile.device_name = Some(device.clone());
    }

    Ok((name, profile))
}

/// Translate the effective profile into a `ClientConfig`.
///
/// A `--password` flag wins over the profile's credential chain.
pub fn resolve_client_config(
    global: &GlobalOpts,
    config: &Config,
    profile_name: &str,
    profile: &Profile,
) -> Result<ClientConfig, CliError> {
    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => vdirect_config::resolve_password(profile, profile_name)?,
    };
    Ok(vdirect_config::profile_to_client_config(
        profile,
        profile_name,
        &config.defaults,
        password,
    )?)
}

/// The device commands run against (flag > profile).
pub fn resolve_device(global: &GlobalOpts, profile: &Profile) -> Result<DeviceTarget, CliError> {
    let name = profile.device_name.clone().ok_or(CliError::NoDevice)?;
    let family = match global.device_type {
        Some(arg) => device_family(arg),
        None => match profile.device_type.as_deref() {
            Some(raw) => vdirect_config::parse_device_family(raw)?,
            None => DeviceFamily::default(),
        },
    };
    Ok(DeviceTarget::new(family, name))
}

fn device_family(arg: DeviceTypeArg) -> DeviceFamily {
    match arg {
        DeviceTypeArg::Alteon => DeviceFamily::Alteon,
        DeviceTypeArg::DefensePro => DeviceFamily::DefensePro,
        DeviceTypeArg::AppWall => DeviceFamily::AppWall,
    }
}

/// How workflow commands wait, from flags and the configured default delay.
pub fn completion(sync: &SyncArgs, defaults: &Defaults) -> Completion {
    if sync.no_sync {
        return Completion::FireAndForget;
    }
    Completion::Wait {
        delay: Duration::from_secs(sync.async_delay.unwrap_or(defaults.async_delay)),
    }
}
