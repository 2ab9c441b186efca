//! Shared helpers for command handlers.

use std::path::Path;

use serde_json::{Map, Value};

use crate::cli::ParamArgs;
use crate::error::CliError;

/// Collect parameter values from `--params-file` and `--param` flags.
///
/// File values come first; a `--param` for the same key replaces them.
pub fn collect_params(args: &ParamArgs) -> Result<Map<String, Value>, CliError> {
    let mut params = match args.params_file {
        Some(ref path) => read_params_file(path)?,
        None => Map::new(),
    };
    for raw in &args.params {
        let (key, value) = parse_param(raw)?;
        params.insert(key, value);
    }
    Ok(params)
}

/// Split `KEY=VALUE`.
///
/// Values opening with `[`, `{` or `"` are read as JSON when they parse;
/// everything else stays text and is coerced to the declared type later.
pub fn parse_param(raw: &str) -> Result<(String, Value), CliError> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(CliError::Validation {
            field: "param".into(),
            reason: format!("expected KEY=VALUE, got '{raw}'"),
        });
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::Validation {
            field: "param".into(),
            reason: format!("empty parameter name in '{raw}'"),
        });
    }
    let value = if value.trim_start().starts_with(['[', '{', '"']) {
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()))
    } else {
        Value::String(value.to_owned())
    };
    Ok((key.to_owned(), value))
}

/// Read a JSON or YAML file holding a parameter object.
pub fn read_params_file(path: &Path) -> Result<Map<String, Value>, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::LocalIo {
        path: path.display().to_string(),
        message: format!("unable to read parameter file ({e})"),
    })?;
    // YAML is a superset of JSON
    let value: Value = serde_yaml::from_str(&contents).map_err(|e| CliError::Validation {
        field: "params-file".into(),
        reason: format!("{}: {e}", path.display()),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(CliError::Validation {
            field: "params-file".into(),
            reason: format!("{} must contain a mapping of parameter names", path.display()),
        }),
    }
}
