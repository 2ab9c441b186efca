// ── Workflows ──
//
// Creation from a workflow template, actions on running workflows and
// deletion. Creation and actions are schema-driven: the action's schema
// is fetched first and the caller's values are bound against it.

use serde_json::{Map, Value};
use tracing::{debug, info};

use vdirect_api::models::ActionSchema;
use vdirect_api::workflows::CREATE_WORKFLOW_ACTION;

use crate::binding::bind;
use crate::error::CoreError;
use crate::execution::{Completion, Operation, finish};
use crate::outcome::Outcome;
use crate::request::{ExecutionRequest, build_workflow_request};
use crate::schema::{ParameterSchema, SchemaMode, map_action_schema};
use crate::session::{Session, unexpected};

/// What a workflow schema is fetched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowTarget<'a> {
    /// `createWorkflow` of a workflow template.
    Create { template: &'a str },
    /// An action of a running workflow.
    Action { workflow: &'a str, action: &'a str },
}

/// Options for workflow operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowOptions {
    pub completion: Completion,
    /// Fetch and validate, but submit nothing.
    pub check_mode: bool,
}

impl Session {
    async fn fetch_action_schema(
        &self,
        target: WorkflowTarget<'_>,
    ) -> Result<ActionSchema, CoreError> {
        let (resp, entity_type, identifier) = match target {
            WorkflowTarget::Create { template } => (
                self.client().create_workflow_schema(template).await?,
                "workflow template",
                template,
            ),
            WorkflowTarget::Action { workflow, action } => (
                self.client().action_schema(workflow, action).await?,
                "workflow",
                workflow,
            ),
        };

        match resp.status_code() {
            200 => resp.json().map_err(|e| CoreError::Schema {
                message: "unable to parse workflow schema response".into(),
                detail: Some(e.to_string()),
            }),
            // vDirect answers 204 for an action the workflow does not define
            204 => Err(CoreError::NotFound {
                entity_type: "workflow action".into(),
                identifier: match target {
                    WorkflowTarget::Create { .. } => CREATE_WORKFLOW_ACTION.into(),
                    WorkflowTarget::Action { action, .. } => action.into(),
                },
            }),
            404 => Err(CoreError::NotFound {
                entity_type: entity_type.into(),
                identifier: identifier.into(),
            }),
            _ => Err(unexpected(&resp, &format!("unable to fetch schema of {identifier}"))),
        }
    }

    /// Parameter schema of a workflow creation or action.
    pub async fn workflow_schema(
        &self,
        target: WorkflowTarget<'_>,
    ) -> Result<ParameterSchema, CoreError> {
        let raw = self.fetch_action_schema(target).await?;
        Ok(map_action_schema(&raw, SchemaMode::Execute))
    }

    /// Describe the parameters a workflow creation or action accepts.
    pub async fn describe_workflow(&self, target: WorkflowTarget<'_>) -> Result<Outcome, CoreError> {
        let raw = self.fetch_action_schema(target).await?;
        Ok(Outcome::described(
            map_action_schema(&raw, SchemaMode::Describe).usage(),
        ))
    }

    /// Bind `values` against the target's schema and build the request.
    async fn prepare(
        &self,
        target: WorkflowTarget<'_>,
        values: Map<String, Value>,
    ) -> Result<ExecutionRequest, CoreError> {
        let schema = self.workflow_schema(target).await?;
        let bound = bind(&schema, values)?;
        build_workflow_request(&schema, bound)
    }

    /// Create workflow `workflow` from workflow template `template`.
    pub async fn create_workflow(
        &self,
        template: &str,
        workflow: &str,
        values: Map<String, Value>,
        options: WorkflowOptions,
    ) -> Result<Outcome, CoreError> {
        let request = self.prepare(WorkflowTarget::Create { template }, values).await?;
        if options.check_mode {
            debug!(template, workflow, "check mode, workflow not created");
            return Ok(Outcome::unchanged());
        }

        let resp = self.client().create_workflow(template, workflow, &request).await?;
        let finished = finish(
            self,
            Operation::CreateWorkflow { template, workflow },
            &resp,
            options.completion,
        )
        .await?;
        info!(template, workflow, "workflow created");
        Ok(finished.into())
    }

    /// Run `action` on workflow `workflow`.
    pub async fn run_action(
        &self,
        workflow: &str,
        action: &str,
        values: Map<String, Value>,
        options: WorkflowOptions,
    ) -> Result<Outcome, CoreError> {
        let request = self
            .prepare(WorkflowTarget::Action { workflow, action }, values)
            .await?;
        if options.check_mode {
            debug!(workflow, action, "check mode, action not run");
            return Ok(Outcome::unchanged());
        }

        let resp = self.client().run_action(workflow, action, &request).await?;
        let finished = finish(
            self,
            Operation::RunAction { workflow, action },
            &resp,
            options.completion,
        )
        .await?;
        info!(workflow, action, "workflow action run");
        Ok(finished.into())
    }

    /// Delete workflow `workflow`.
    pub async fn delete_workflow(
        &self,
        workflow: &str,
        options: WorkflowOptions,
    ) -> Result<Outcome, CoreError> {
        if options.check_mode {
            debug!(workflow, "check mode, workflow not deleted");
            return Ok(Outcome::unchanged());
        }

        let resp = self.client().delete_workflow(workflow).await?;
        let finished = finish(
            self,
            Operation::DeleteWorkflow { workflow },
            &resp,
            options.completion,
        )
        .await?;
        info!(workflow, "workflow deleted");
        Ok(finished.into())
    }
}
