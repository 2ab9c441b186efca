// vDirect wire models
//
// Serde types for the JSON bodies the client reads. Only the fields the
// integration layer consumes are typed; parameter definitions keep their
// remaining keys in `extra` so describe mode can pass them through.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Service metadata from `GET api`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInfo {
    /// Raw version string, e.g. `"4.1.0 build 77"` or `"4.2-SNAPSHOT"`.
    #[serde(rename = "vDirectVersion")]
    pub version: String,
}

// ── Templates ────────────────────────────────────────────────────────

/// Configuration template resource from `GET api/template/{name}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateResource {
    #[serde(default = "default_true")]
    pub valid: bool,
    /// Validation error text when `valid` is false.
    #[serde(default)]
    pub message: Option<String>,
    pub info: TemplateInfo,
}

fn default_true() -> bool {
    true
}

/// Compiled template metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub devices: Vec<TemplateDevice>,
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    #[serde(default)]
    pub user_types: Vec<UserType>,
}

/// A device role declared by a template.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateDevice {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
}

/// A user-defined structure type referenced by template parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct UserType {
    pub name: String,
    #[serde(default)]
    pub fields: Value,
}

// ── Workflows ────────────────────────────────────────────────────────

/// Parameter schema of a workflow action (including `createWorkflow`).
#[derive(Debug, Clone, Deserialize)]
pub struct ActionSchema {
    #[serde(default)]
    pub devices: Vec<ActionDevice>,
    #[serde(default)]
    pub properties: Vec<ParameterDefinition>,
}

/// A device role declared by a workflow action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDevice {
    pub name: String,
    /// Number of devices the role accepts; 1 means a single device.
    pub max_length: u32,
}

// ── Parameters ───────────────────────────────────────────────────────

/// A declared input/output parameter, shared by both schema shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub direction: Option<String>,
    /// `Some(Value::Null)` when the key is present with a null value.
    #[serde(default, deserialize_with = "present")]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub values: Option<Vec<Value>>,
    /// Descriptive keys (`prompt`, `pattern`, `min`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Deserialize a field that may be explicitly null, distinguishing
/// "present and null" from "absent" (the latter handled by `default`).
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// ── Async operations ─────────────────────────────────────────────────

/// Status document of a long-running operation.
///
/// Returned with the initial 202 and by every poll of `uri`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AsyncStatus {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// Response of a device commit action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitStatus {
    pub commit_needed: bool,
}
