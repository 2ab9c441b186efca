// Workflow template and workflow endpoints
//
// Archive upload, parameter schema lookup, workflow lifecycle actions and
// polling of asynchronous operations.

use bytes::Bytes;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::client::{ApiResponse, Body, TEMPLATE_PARAMETERS, VdirectClient, ZIP_ARCHIVE};
use crate::error::Error;

/// Name of the built-in action that instantiates a workflow template.
pub const CREATE_WORKFLOW_ACTION: &str = "createWorkflow";

impl VdirectClient {
    // ── Workflow templates ───────────────────────────────────────────

    /// `GET api/workflowTemplate/{name}` — 404 when absent.
    pub async fn get_workflow_template(&self, name: &str) -> Result<ApiResponse, Error> {
        let url = self.url(&["api", "workflowTemplate", name])?;
        self.get(url).await
    }

    /// Upload a new workflow template archive.
    ///
    /// `POST api/workflowTemplate?failIfInvalid=true` — the server takes the
    /// template name from the archive's `workflow.xml`.
    pub async fn create_workflow_template(&self, archive: Bytes) -> Result<ApiResponse, Error> {
        let url = self.url_with_query(&["api", "workflowTemplate"], &[("failIfInvalid", "true")])?;
        debug!("uploading workflow template archive");
        self.post(
            url,
            Body::Raw {
                data: archive,
                content_type: ZIP_ARCHIVE,
            },
        )
        .await
    }

    /// Replace the archive of an existing workflow template.
    ///
    /// `PUT api/workflowTemplate/{name}/archive?failIfInvalid=true`
    pub async fn update_workflow_template(
        &self,
        name: &str,
        archive: Bytes,
    ) -> Result<ApiResponse, Error> {
        let url = self.url_with_query(
            &["api", "workflowTemplate", name, "archive"],
            &[("failIfInvalid", "true")],
        )?;
        debug!(workflow_template = name, "replacing workflow template archive");
        self.put(
            url,
            Body::Raw {
                data: archive,
                content_type: ZIP_ARCHIVE,
            },
        )
        .await
    }

    // ── Parameter schemas ────────────────────────────────────────────

    /// Parameter schema of a template's `createWorkflow` action.
    ///
    /// `GET api/workflowTemplate/{template}/action/createWorkflow`
    pub async fn create_workflow_schema(&self, template: &str) -> Result<ApiResponse, Error> {
        let url = self.url(&[
            "api",
            "workflowTemplate",
            template,
            "action",
            CREATE_WORKFLOW_ACTION,
        ])?;
        self.get(url).await
    }

    /// Parameter schema of an action on a running workflow.
    ///
    /// `GET api/workflow/{workflow}/action/{action}`
    pub async fn action_schema(&self, workflow: &str, action: &str) -> Result<ApiResponse, Error> {
        let url = self.url(&["api", "workflow", workflow, "action", action])?;
        self.get(url).await
    }

    // ── Workflow lifecycle ───────────────────────────────────────────

    /// Instantiate a workflow from a template.
    ///
    /// `POST api/workflowTemplate/{template}?name={workflow}`
    pub async fn create_workflow(
        &self,
        template: &str,
        workflow: &str,
        payload: &(impl Serialize + Sync),
    ) -> Result<ApiResponse, Error> {
        let url = self.url_with_query(&["api", "workflowTemplate", template], &[("name", workflow)])?;
        debug!(template, workflow, "creating workflow");
        self.post(url, Body::json(payload, TEMPLATE_PARAMETERS)?)
            .await
    }

    /// Run an action on a workflow.
    ///
    /// `POST api/workflow/{workflow}/action/{action}`
    pub async fn run_action(
        &self,
        workflow: &str,
        action: &str,
        payload: &(impl Serialize + Sync),
    ) -> Result<ApiResponse, Error> {
        let url = self.url(&["api", "workflow", workflow, "action", action])?;
        debug!(workflow, action, "running workflow action");
        self.post(url, Body::json(payload, TEMPLATE_PARAMETERS)?)
            .await
    }

    /// Delete a workflow (runs its delete action on the server).
    ///
    /// `DELETE api/workflow/{workflow}`
    pub async fn delete_workflow(&self, workflow: &str) -> Result<ApiResponse, Error> {
        let url = self.url(&["api", "workflow", workflow])?;
        debug!(workflow, "deleting workflow");
        self.delete(url).await
    }

    // ── Async operations ─────────────────────────────────────────────

    /// Fetch the status document of an asynchronous operation.
    ///
    /// `uri` is the absolute URL handed out with the 202 response.
    pub async fn poll_status(&self, uri: &Url) -> Result<ApiResponse, Error> {
        self.get(uri.clone()).await
    }
}
