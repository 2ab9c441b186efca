// ── Configuration templates ──

use serde_json::{Map, Value};
use tracing::{debug, info};

use vdirect_api::models::TemplateResource;

use crate::binding::bind;
use crate::config::DeviceTarget;
use crate::error::CoreError;
use crate::execution::{ExecutionResult, Operation, interpret};
use crate::family::{ChangeDetection, DeviceFamily};
use crate::outcome::Outcome;
use crate::request::{ExecutionRequest, build_template_request};
use crate::schema::{ParameterSchema, SchemaMode, map_template_schema};
use crate::session::{Session, unexpected};

/// Facts copied from the run output in check mode.
const DRY_RUN_FACTS: [&str; 2] = ["cliOutput", "generatedScript"];

/// Options for [`Session::run_template`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemplateOptions {
    /// Ask vDirect for a dry run and report nothing as changed.
    pub check_mode: bool,
    /// Commit the device configuration after a successful run.
    pub commit: bool,
}

impl Session {
    async fn fetch_template(&self, name: &str) -> Result<TemplateResource, CoreError> {
        let resp = self.client().get_template(name).await?;
        match resp.status_code() {
            200 => resp.json().map_err(|e| CoreError::Schema {
                message: "unable to parse template response".into(),
                detail: Some(e.to_string()),
            }),
            404 => Err(CoreError::NotFound {
                entity_type: "template".into(),
                identifier: name.into(),
            }),
            _ => Err(unexpected(&resp, &format!("unable to fetch template {name}"))),
        }
    }

    /// Parameter schema of template `name` for execution on `device`.
    pub async fn template_schema(
        &self,
        name: &str,
        device: &DeviceTarget,
    ) -> Result<ParameterSchema, CoreError> {
        let resource = self.fetch_template(name).await?;
        map_template_schema(&resource, device.family, SchemaMode::Execute)
    }

    /// Describe the parameters template `name` accepts.
    ///
    /// The device type the template declares is reported as a fact and
    /// not checked against any configured device.
    pub async fn describe_template(&self, name: &str) -> Result<Outcome, CoreError> {
        let resource = self.fetch_template(name).await?;
        let schema = map_template_schema(&resource, DeviceFamily::default(), SchemaMode::Describe)?;

        let mut facts = Map::new();
        if let Some(binding) = schema.devices.first() {
            facts.insert("device_role".to_owned(), Value::from(binding.role.clone()));
            if let Some(ref device_type) = binding.device_type {
                facts.insert("device_type".to_owned(), Value::from(device_type.clone()));
            }
        }
        Ok(Outcome::described(schema.usage()).with_facts(facts))
    }

    /// Run template `name` against `device`.
    ///
    /// Output parameters of the run become facts. In check mode the run is
    /// a dry run, the generated script and the request sent are added to
    /// the facts, and nothing is reported as changed.
    pub async fn run_template(
        &self,
        name: &str,
        device: &DeviceTarget,
        values: Map<String, Value>,
        options: TemplateOptions,
    ) -> Result<Outcome, CoreError> {
        if device.family.change_detection() == ChangeDetection::Unsupported {
            return Err(CoreError::Unsupported {
                operation: "configuration template execution".into(),
                device_type: device.family.to_string(),
            });
        }

        let schema = self.template_schema(name, device).await?;
        let values = bind(&schema, values)?;
        let request = build_template_request(&schema, values, &device.name, options.check_mode)?;

        let (output, mut changed) = self.execute_on_device(device, name, &request).await?;

        let mut facts = Map::new();
        if options.check_mode {
            changed = false;
            for key in DRY_RUN_FACTS {
                if let Some(value) = output.get(key) {
                    facts.insert(key.to_owned(), value.clone());
                }
            }
            facts.insert("sent_params".to_owned(), request.to_json());
        }
        if let Some(Value::Object(parameters)) = output.get("parameters") {
            facts.extend(parameters.clone());
        }

        if options.commit && !options.check_mode {
            changed = self.commit(device, false).await?.changed;
        }

        info!(template = name, device = %device.name, changed, "template executed");
        Ok(Outcome::with_changed(changed).with_facts(facts))
    }

    /// Submit a template run and return its output body.
    pub(crate) async fn submit_template(
        &self,
        name: &str,
        request: &ExecutionRequest,
    ) -> Result<Value, CoreError> {
        debug!(template = name, dry_run = request.dry_run, "submitting template run");
        let resp = self.client().run_template(name, request).await?;
        match interpret(Operation::RunTemplate { template: name }, &resp)? {
            ExecutionResult::Immediate { output } => Ok(output.unwrap_or(Value::Null)),
            ExecutionResult::Accepted(_) => Err(unexpected(
                &resp,
                &format!("template {name} was not executed synchronously"),
            )),
        }
    }
}
