// ── Execution requests ──
//
// The JSON body vDirect expects for template runs and workflow
// operations: input parameters, device connections keyed by role, and an
// optional dry-run flag. Device-role keys never appear among the
// parameters.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::schema::{Cardinality, ParameterSchema};

/// Reference to a device registered in vDirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceId {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConnection {
    pub device_id: DeviceId,
}

impl DeviceConnection {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            device_id: DeviceId { name: name.into() },
        }
    }
}

/// Body of a template run or workflow operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    pub parameters: Map<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub device_connections: BTreeMap<String, Vec<DeviceConnection>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
}

impl ExecutionRequest {
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Build a template run for the configured device.
///
/// The schema's single device role is bound to `device_name`.
pub fn build_template_request(
    schema: &ParameterSchema,
    parameters: Map<String, Value>,
    device_name: &str,
    dry_run: bool,
) -> Result<ExecutionRequest, CoreError> {
    let binding = schema
        .devices
        .first()
        .ok_or_else(|| CoreError::schema("template declares no device"))?;

    let parameters = parameters
        .into_iter()
        .filter(|(key, _)| *key != binding.role)
        .collect();

    let mut device_connections = BTreeMap::new();
    device_connections.insert(binding.role.clone(), vec![DeviceConnection::named(device_name)]);

    Ok(ExecutionRequest {
        parameters,
        device_connections,
        dry_run,
    })
}

/// Build a workflow operation from bound values.
///
/// Each device role is moved out of `values` into the connections; single
/// roles take one device name, multiple roles a list of names.
pub fn build_workflow_request(
    schema: &ParameterSchema,
    mut values: Map<String, Value>,
) -> Result<ExecutionRequest, CoreError> {
    let mut device_connections = BTreeMap::new();

    for binding in &schema.devices {
        let Some(value) = values.remove(&binding.role) else {
            return Err(CoreError::invalid(format!(
                "missing required device parameter: {}",
                binding.role
            )));
        };

        let names = match (binding.cardinality, value) {
            (_, Value::String(name)) => vec![name],
            (Cardinality::Multiple, Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name),
                    other => Err(CoreError::invalid(format!(
                        "device parameter '{}' must list device names, got {other}",
                        binding.role
                    ))),
                })
                .collect::<Result<_, _>>()?,
            (_, other) => {
                return Err(CoreError::invalid(format!(
                    "device parameter '{}' must be a device name, got {other}",
                    binding.role
                )));
            }
        };

        device_connections.insert(
            binding.role.clone(),
            names.into_iter().map(DeviceConnection::named).collect(),
        );
    }

    Ok(ExecutionRequest {
        parameters: values,
        device_connections,
        dry_run: false,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use vdirect_api::models::{ActionSchema, TemplateResource};

    use super::*;
    use crate::family::DeviceFamily;
    use crate::schema::{SchemaMode, map_action_schema, map_template_schema};

    fn object(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn template_request_binds_configured_device() {
        let raw: TemplateResource = serde_json::from_value(json!({
            "info": {
                "devices": [{ "name": "adc", "type": "alteon" }],
                "parameters": [{ "name": "vip", "type": "ip" }]
            }
        }))
        .unwrap();
        let schema = map_template_schema(&raw, DeviceFamily::Alteon, SchemaMode::Execute).unwrap();

        let request =
            build_template_request(&schema, object(json!({ "vip": "10.0.0.1" })), "adc1", true)
                .unwrap();

        assert_eq!(
            request.to_json(),
            json!({
                "parameters": { "vip": "10.0.0.1" },
                "deviceConnections": { "adc": [{ "deviceId": { "name": "adc1" } }] },
                "dryRun": true
            })
        );
    }

    #[test]
    fn workflow_request_moves_roles_out_of_parameters() {
        let raw: ActionSchema = serde_json::from_value(json!({
            "devices": [
                { "name": "adc", "maxLength": 1 },
                { "name": "peers", "maxLength": 4 }
            ],
            "properties": [{ "name": "vip", "type": "ip" }]
        }))
        .unwrap();
        let schema = map_action_schema(&raw, SchemaMode::Execute);

        let request = build_workflow_request(
            &schema,
            object(json!({ "adc": "adc1", "peers": ["p1", "p2"], "vip": "10.0.0.1" })),
        )
        .unwrap();

        for role in request.device_connections.keys() {
            assert!(!request.parameters.contains_key(role));
        }
        assert_eq!(
            request.to_json(),
            json!({
                "parameters": { "vip": "10.0.0.1" },
                "deviceConnections": {
                    "adc": [{ "deviceId": { "name": "adc1" } }],
                    "peers": [
                        { "deviceId": { "name": "p1" } },
                        { "deviceId": { "name": "p2" } }
                    ]
                }
            })
        );
    }

    #[test]
    fn workflow_without_devices_sends_parameters_only() {
        let raw: ActionSchema =
            serde_json::from_value(json!({ "properties": [{ "name": "idle", "type": "int" }] }))
                .unwrap();
        let schema = map_action_schema(&raw, SchemaMode::Execute);
        let request = build_workflow_request(&schema, object(json!({ "idle": 30 }))).unwrap();
        assert_eq!(request.to_json(), json!({ "parameters": { "idle": 30 } }));
    }

    #[test]
    fn single_role_rejects_a_list() {
        let raw: ActionSchema =
            serde_json::from_value(json!({ "devices": [{ "name": "adc", "maxLength": 1 }] }))
                .unwrap();
        let schema = map_action_schema(&raw, SchemaMode::Execute);
        let err = build_workflow_request(&schema, object(json!({ "adc": ["a", "b"] }))).unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameters { .. }));
    }
}
