//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};
use serde_json::Value;

use vdirect_core::{DEFAULT_PORT, Scheme};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const MASK: &str = "********";

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_secret(label: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(label).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(secret)
}

/// Config as a JSON tree with stored passwords masked.
fn redacted(cfg: &Config) -> Result<Value, CliError> {
    let mut tree = serde_json::to_value(cfg)?;
    if let Some(Value::Object(profiles)) = tree.get_mut("profiles") {
        for profile in profiles.values_mut() {
            if let Some(password) = profile.get_mut("password").filter(|p| !p.is_null()) {
                *password = Value::from(MASK);
            }
        }
    }
    Ok(tree)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render(global.output, &redacted(&cfg)?)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    path: config::config_path().display().to_string(),
                });
            }

            let password = prompt_secret("Password: ")?;
            vdirect_config::store_password(&profile_name, &password)?;
            eprintln!("✓ Password stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

/// Interactive wizard writing a profile to the config file.
fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("vDirect CLI configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(global.profile.clone().unwrap_or_else(|| "default".into()))
        .interact_text()
        .map_err(prompt_err)?;

    let vdirect_ip: String = Input::new()
        .with_prompt("vDirect address")
        .interact_text()
        .map_err(prompt_err)?;

    let secondary: String = Input::new()
        .with_prompt("Secondary vDirect address (HA pair, blank for none)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(DEFAULT_PORT)
        .interact_text()
        .map_err(prompt_err)?;

    let scheme = match Select::new()
        .with_prompt("Scheme")
        .items(&["https", "http"])
        .default(0)
        .interact()
        .map_err(prompt_err)?
    {
        0 => Scheme::Https,
        _ => Scheme::Http,
    };

    let validate_certs = Confirm::new()
        .with_prompt("Validate the server certificate?")
        .default(true)
        .interact()
        .map_err(prompt_err)?;

    let username: String = Input::new()
        .with_prompt("Username")
        .interact_text()
        .map_err(prompt_err)?;
    let password = prompt_secret("Password: ")?;

    let store_choices = &[
        "Store password in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let in_keyring = Select::new()
        .with_prompt("Where to store the password?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?
        == 0;

    let password = if in_keyring {
        vdirect_config::store_password(&profile_name, &password)?;
        eprintln!("   ✓ Password stored in system keyring");
        None
    } else {
        Some(password)
    };

    let device_name: String = Input::new()
        .with_prompt("Default device name (blank for none)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let device_type = match Select::new()
        .with_prompt("Default device type")
        .items(&["alteon", "defensepro", "appwall"])
        .default(0)
        .interact()
        .map_err(prompt_err)?
    {
        0 => "alteon",
        1 => "defensepro",
        _ => "appwall",
    };

    let profile = Profile {
        vdirect_ip,
        secondary_vdirect_ip: Some(secondary).filter(|s| !s.is_empty()),
        port,
        scheme,
        username: Some(username),
        password,
        validate_certs: (!validate_certs).then_some(false),
        device_type: Some(device_type.into()),
        device_name: Some(device_name).filter(|s| !s.is_empty()),
        ..Profile::default()
    };

    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(profile_name.clone(), profile);
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(profile_name.clone());
    }
    let path = config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", path.display());
    eprintln!("  Profile: {profile_name}");
    eprintln!("\n  Test it: vdirect template describe <name> -p {profile_name}");
    Ok(())
}
