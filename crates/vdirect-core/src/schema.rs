// ── Parameter schema ──
//
// Normalized view of the parameters and device roles a template or
// workflow action declares. vDirect returns two different JSON shapes for
// these; each has its own mapping function, and both produce the same
// `ParameterSchema`.

use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use vdirect_api::models::{ActionSchema, ParameterDefinition, TemplateResource, UserType};

use crate::error::CoreError;
use crate::family::DeviceFamily;

/// Keys copied verbatim into a descriptor in describe mode.
const DESCRIBE_KEYS: [&str; 7] = [
    "prompt",
    "pattern",
    "separator",
    "min",
    "max",
    "maxCharLength",
    "minCharLength",
];

// ── Model ────────────────────────────────────────────────────────────

/// Normalized parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[serde(rename = "str")]
    String,
    #[serde(rename = "int")]
    Integer,
    #[serde(rename = "bool")]
    Boolean,
    List,
    #[serde(rename = "dict")]
    Object,
}

impl ParamType {
    /// Map a vDirect declared type.
    ///
    /// Address-like types are plain strings, `int`/`bool` pass through,
    /// `T[]` is a list and anything else is a user-defined structure.
    pub fn from_declared(declared: &str) -> Self {
        match declared {
            "string" | "ip" | "ipv4" | "ipv6" | "adcService" => Self::String,
            "int" => Self::Integer,
            "bool" => Self::Boolean,
            other if other.ends_with("[]") => Self::List,
            _ => Self::Object,
        }
    }
}

/// Declared parameter direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    InOut,
    Out,
    Undeclared,
}

impl Direction {
    fn from_declared(declared: Option<&str>) -> Self {
        match declared {
            None => Self::Undeclared,
            Some("in") => Self::In,
            Some("inout") => Self::InOut,
            // anything else is produced by the target, never consumed
            Some(_) => Self::Out,
        }
    }

    /// `true` when the caller may supply this parameter.
    pub fn is_input(self) -> bool {
        !matches!(self, Self::Out)
    }
}

/// One caller-facing parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParamType,
    /// Type name as declared by vDirect.
    #[serde(skip)]
    pub declared_type: String,
    #[serde(skip)]
    pub direction: Direction,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Value>>,
    /// Describe-mode hints (prompt, pattern, bounds).
    #[serde(flatten)]
    pub annotations: Map<String, Value>,
    /// Field definitions of a structure parameter (describe mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<Value>,
}

/// How many devices a role binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    Single,
    Multiple,
}

/// A device role declared by the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceBinding {
    pub role: String,
    pub cardinality: Cardinality,
    /// Device type the role requires (templates only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
}

/// Where device identities for the bindings come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSource {
    /// The configured device target (templates).
    Configured,
    /// Caller-supplied values keyed by role name (workflows).
    Caller,
}

/// Normalized parameter schema of a template or workflow action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSchema {
    pub devices: Vec<DeviceBinding>,
    pub device_source: DeviceSource,
    pub parameters: IndexMap<String, ParameterDescriptor>,
}

impl ParameterSchema {
    /// Names the caller may supply, device roles first.
    pub fn exposed_names(&self) -> Vec<&str> {
        let roles = self
            .devices
            .iter()
            .filter(|_| self.device_source == DeviceSource::Caller)
            .map(|d| d.role.as_str());
        roles.chain(self.parameters.keys().map(String::as_str)).collect()
    }

    /// The binding for `role`, if declared.
    pub fn device(&self, role: &str) -> Option<&DeviceBinding> {
        self.devices.iter().find(|d| d.role == role)
    }

    /// Caller-facing description used by describe mode.
    ///
    /// Device roles supplied by the caller appear as required parameters.
    pub fn usage(&self) -> Value {
        let mut usage = Map::new();
        if self.device_source == DeviceSource::Caller {
            for binding in &self.devices {
                let kind = match binding.cardinality {
                    Cardinality::Single => "str",
                    Cardinality::Multiple => "list",
                };
                usage.insert(
                    binding.role.clone(),
                    serde_json::json!({ "type": kind, "required": true }),
                );
            }
        }
        for (name, descriptor) in &self.parameters {
            usage.insert(
                name.clone(),
                serde_json::to_value(descriptor).unwrap_or(Value::Null),
            );
        }
        Value::Object(usage)
    }
}

/// Whether descriptive metadata is carried into the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaMode {
    Execute,
    Describe,
}

// ── Template schemas ─────────────────────────────────────────────────

/// Map a template resource for execution on `family` devices.
///
/// The template must be valid and declare exactly one device role. Its
/// device type must match `family` unless `mode` is `Describe`.
pub fn map_template_schema(
    resource: &TemplateResource,
    family: DeviceFamily,
    mode: SchemaMode,
) -> Result<ParameterSchema, CoreError> {
    if !resource.valid {
        return Err(CoreError::Schema {
            message: "requested template is not valid".into(),
            detail: resource.message.clone(),
        });
    }

    let info = &resource.info;
    let device = match info.devices.as_slice() {
        [device] => device,
        [] => return Err(CoreError::schema("unable to parse response: template declares no device")),
        _ => {
            return Err(CoreError::schema(format!(
                "multi device template not supported ({} devices declared)",
                info.devices.len()
            )));
        }
    };

    let declared_family = DeviceFamily::from_str(&device.device_type).ok();
    if mode == SchemaMode::Execute && declared_family != Some(family) {
        return Err(CoreError::schema(format!(
            "device type mismatch: template requires '{}', configured device type is '{family}'",
            device.device_type
        )));
    }

    Ok(ParameterSchema {
        devices: vec![DeviceBinding {
            role: device.name.clone(),
            cardinality: Cardinality::Single,
            device_type: Some(device.device_type.clone()),
        }],
        device_source: DeviceSource::Configured,
        parameters: map_parameters(&info.parameters, &info.user_types, mode),
    })
}

// ── Workflow schemas ─────────────────────────────────────────────────

/// Map a workflow action schema (including `createWorkflow`).
pub fn map_action_schema(schema: &ActionSchema, mode: SchemaMode) -> ParameterSchema {
    let devices: Vec<DeviceBinding> = schema
        .devices
        .iter()
        .map(|device| DeviceBinding {
            role: device.name.clone(),
            cardinality: if device.max_length == 1 {
                Cardinality::Single
            } else {
                Cardinality::Multiple
            },
            device_type: None,
        })
        .collect();

    let mut parameters = map_parameters(&schema.properties, &[], mode);
    parameters.retain(|name, _| {
        let shadowed = devices.iter().any(|d| &d.role == name);
        if shadowed {
            debug!(parameter = %name, "parameter shadows a device role, dropped");
        }
        !shadowed
    });

    ParameterSchema {
        devices,
        device_source: DeviceSource::Caller,
        parameters,
    }
}

// ── Shared parameter mapping ─────────────────────────────────────────

fn map_parameters(
    definitions: &[ParameterDefinition],
    user_types: &[UserType],
    mode: SchemaMode,
) -> IndexMap<String, ParameterDescriptor> {
    definitions
        .iter()
        .filter_map(|def| {
            let direction = Direction::from_declared(def.direction.as_deref());
            direction
                .is_input()
                .then(|| (def.name.clone(), map_parameter(def, direction, user_types, mode)))
        })
        .collect()
}

fn map_parameter(
    def: &ParameterDefinition,
    direction: Direction,
    user_types: &[UserType],
    mode: SchemaMode,
) -> ParameterDescriptor {
    let kind = ParamType::from_declared(&def.param_type);

    let mut annotations = Map::new();
    let mut definition = None;
    if mode == SchemaMode::Describe {
        for key in DESCRIBE_KEYS {
            if let Some(value) = def.extra.get(key) {
                annotations.insert(key.to_owned(), value.clone());
            }
        }
        if kind == ParamType::Object {
            definition = user_types
                .iter()
                .find(|t| t.name == def.param_type)
                .map(|t| t.fields.clone());
        }
    }

    ParameterDescriptor {
        name: def.name.clone(),
        kind,
        declared_type: def.param_type.clone(),
        direction,
        required: def.default_value.is_none(),
        default: def.default_value.clone(),
        choices: def.values.clone(),
        annotations,
        definition,
    }
}
