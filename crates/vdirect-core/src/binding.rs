// ── Parameter binding ──
//
// Checks caller-supplied values against a `ParameterSchema` and coerces
// them to the declared types. Only keys the caller supplied are returned;
// defaults stay on the service side.

use serde_json::{Map, Number, Value};

use crate::error::CoreError;
use crate::schema::{Cardinality, DeviceSource, ParamType, ParameterDescriptor, ParameterSchema};

/// Validate and coerce `values` against `schema`.
///
/// Null values count as absent. Unknown keys, missing required
/// parameters, uncoercible values and values outside the declared choices
/// are all rejected with [`CoreError::InvalidParameters`].
pub fn bind(schema: &ParameterSchema, values: Map<String, Value>) -> Result<Map<String, Value>, CoreError> {
    let mut values: Map<String, Value> = values.into_iter().filter(|(_, v)| !v.is_null()).collect();

    let exposed = schema.exposed_names();
    let unknown: Vec<&str> = values
        .keys()
        .map(String::as_str)
        .filter(|key| !exposed.contains(key))
        .collect();
    if !unknown.is_empty() {
        return Err(CoreError::invalid(format!(
            "unsupported parameters: {} (supported: {})",
            unknown.join(", "),
            exposed.join(", ")
        )));
    }

    let mut bound = Map::new();

    if schema.device_source == DeviceSource::Caller {
        for binding in &schema.devices {
            let value = values.remove(&binding.role).ok_or_else(|| {
                CoreError::invalid(format!("missing required device parameter: {}", binding.role))
            })?;
            let coerced = match binding.cardinality {
                Cardinality::Single => coerce_string(&binding.role, value)?,
                Cardinality::Multiple => coerce_list(&binding.role, value)?,
            };
            bound.insert(binding.role.clone(), coerced);
        }
    }

    let missing: Vec<&str> = schema
        .parameters
        .values()
        .filter(|p| p.required && !values.contains_key(&p.name))
        .map(|p| p.name.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(CoreError::invalid(format!(
            "missing required parameters: {}",
            missing.join(", ")
        )));
    }

    for (name, descriptor) in &schema.parameters {
        if let Some(value) = values.remove(name) {
            bound.insert(name.clone(), coerce(descriptor, value)?);
        }
    }

    Ok(bound)
}

fn coerce(descriptor: &ParameterDescriptor, value: Value) -> Result<Value, CoreError> {
    let name = descriptor.name.as_str();
    let value = match descriptor.kind {
        ParamType::String => coerce_string(name, value)?,
        ParamType::Integer => coerce_integer(name, value)?,
        ParamType::Boolean => coerce_boolean(name, value)?,
        ParamType::List => coerce_list(name, value)?,
        ParamType::Object => coerce_object(name, value)?,
    };

    if let Some(choices) = &descriptor.choices {
        check_choices(name, &value, choices)?;
    }
    Ok(value)
}

fn type_error(name: &str, expected: &str, value: &Value) -> CoreError {
    CoreError::invalid(format!("parameter '{name}' expects {expected}, got {value}"))
}

fn coerce_string(name: &str, value: Value) -> Result<Value, CoreError> {
    match value {
        Value::String(_) => Ok(value),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        other => Err(type_error(name, "a string", &other)),
    }
}

fn coerce_integer(name: &str, value: Value) -> Result<Value, CoreError> {
    match &value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(|n| Value::Number(Number::from(n)))
            .map_err(|_| type_error(name, "an integer", &value)),
        _ => Err(type_error(name, "an integer", &value)),
    }
}

fn coerce_boolean(name: &str, value: Value) -> Result<Value, CoreError> {
    match &value {
        Value::Bool(_) => Ok(value),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
            _ => Err(type_error(name, "a boolean", &value)),
        },
        Value::Number(n) => match n.as_i64() {
            Some(1) => Ok(Value::Bool(true)),
            Some(0) => Ok(Value::Bool(false)),
            _ => Err(type_error(name, "a boolean", &value)),
        },
        _ => Err(type_error(name, "a boolean", &value)),
    }
}

/// Arrays pass through; a string is split on commas.
fn coerce_list(name: &str, value: Value) -> Result<Value, CoreError> {
    match value {
        Value::Array(_) => Ok(value),
        Value::String(s) => Ok(Value::Array(
            s.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_owned()))
                .collect(),
        )),
        other => Err(type_error(name, "a list", &other)),
    }
}

/// Objects pass through; a string must hold a JSON object.
fn coerce_object(name: &str, value: Value) -> Result<Value, CoreError> {
    match value {
        Value::Object(_) => Ok(value),
        Value::String(ref s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed @ Value::Object(_)) => Ok(parsed),
            _ => Err(type_error(name, "an object", &value)),
        },
        other => Err(type_error(name, "an object", &other)),
    }
}

fn check_choices(name: &str, value: &Value, choices: &[Value]) -> Result<(), CoreError> {
    let allowed = |v: &Value| choices.iter().any(|c| loosely_equal(c, v));
    let ok = match value {
        Value::Array(items) => items.iter().all(allowed),
        single => allowed(single),
    };
    if ok {
        return Ok(());
    }

    let listed: Vec<String> = choices.iter().map(ToString::to_string).collect();
    Err(CoreError::invalid(format!(
        "value of parameter '{name}' must be one of: {}, got {value}",
        listed.join(", ")
    )))
}

/// Choices may be declared as strings for numeric parameters and vice versa.
fn loosely_equal(choice: &Value, value: &Value) -> bool {
    match (choice, value) {
        (Value::String(c), Value::Number(v)) | (Value::Number(v), Value::String(c)) => {
            *c == v.to_string()
        }
        _ => choice == value,
    }
}
