// ── Template and workflow uploads ──
//
// Uploads are idempotent: an existing resource is only replaced when the
// caller allows overwriting, and an identical template source is left
// alone.

use bytes::Bytes;
use tracing::{debug, info};

use vdirect_api::ApiResponse;

use crate::archive::WorkflowArchive;
use crate::error::CoreError;
use crate::outcome::Outcome;
use crate::session::{Session, unexpected};

/// Options for the upload operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Replace a resource that already exists.
    pub overwrite: bool,
    /// Report without sending any mutating request.
    pub check_mode: bool,
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Template,
    WorkflowTemplate,
}

impl Kind {
    fn entity(self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::WorkflowTemplate => "workflow template",
        }
    }

    fn source(self) -> &'static str {
        match self {
            Self::Template => "velocity source",
            Self::WorkflowTemplate => "workflow archive",
        }
    }
}

impl Session {
    /// `true` when configuration template `name` exists.
    pub async fn template_exists(&self, name: &str) -> Result<bool, CoreError> {
        let resp = self.client().get_template(name).await?;
        presence(&resp, Kind::Template, name)
    }

    /// `true` when workflow template `name` exists.
    pub async fn workflow_template_exists(&self, name: &str) -> Result<bool, CoreError> {
        let resp = self.client().get_workflow_template(name).await?;
        presence(&resp, Kind::WorkflowTemplate, name)
    }

    /// Create or replace configuration template `name` from Velocity source.
    ///
    /// An existing template whose source is byte-identical to `source` is
    /// not touched.
    pub async fn upload_template(
        &self,
        name: &str,
        source: Bytes,
        options: UploadOptions,
    ) -> Result<Outcome, CoreError> {
        if self.template_exists(name).await? {
            if !options.overwrite {
                return Err(conflict(Kind::Template, name));
            }
            let current = self.client().template_source(name).await?;
            if current == source {
                debug!(template = name, "template source unchanged");
                return Ok(Outcome::unchanged());
            }
            if options.check_mode {
                return Ok(Outcome::unchanged());
            }
            let resp = self.client().update_template_source(name, source).await?;
            accept_upload(&resp, Kind::Template, name)?;
            info!(template = name, "template source replaced");
            return Ok(Outcome::changed());
        }

        if options.check_mode {
            return Ok(Outcome::unchanged());
        }
        let resp = self.client().create_template(name, source).await?;
        accept_upload(&resp, Kind::Template, name)?;
        info!(template = name, "template created");
        Ok(Outcome::changed())
    }

    /// Create or replace the workflow template packed in `archive`.
    pub async fn upload_workflow_archive(
        &self,
        archive: WorkflowArchive,
        options: UploadOptions,
    ) -> Result<Outcome, CoreError> {
        let WorkflowArchive { name, data } = archive;
        let exists = self.workflow_template_exists(&name).await?;

        if exists && !options.overwrite {
            return Err(conflict(Kind::WorkflowTemplate, &name));
        }
        if options.check_mode {
            return Ok(Outcome::unchanged());
        }

        let resp = if exists {
            self.client().update_workflow_template(&name, data).await?
        } else {
            self.client().create_workflow_template(data).await?
        };
        accept_upload(&resp, Kind::WorkflowTemplate, &name)?;
        info!(workflow_template = %name, replaced = exists, "workflow template uploaded");
        Ok(Outcome::changed())
    }
}

fn presence(resp: &ApiResponse, kind: Kind, name: &str) -> Result<bool, CoreError> {
    match resp.status_code() {
        200 => Ok(true),
        404 => Ok(false),
        _ => Err(unexpected(
            resp,
            &format!("unable to look up {} {name}", kind.entity()),
        )),
    }
}

fn accept_upload(resp: &ApiResponse, kind: Kind, name: &str) -> Result<(), CoreError> {
    match resp.status_code() {
        200 | 201 | 204 => Ok(()),
        400 => Err(CoreError::InvalidParameters {
            message: format!("invalid {} for {} {name}", kind.source(), kind.entity()),
            detail: Some(resp.detail()),
        }),
        404 => Err(CoreError::NotFound {
            entity_type: kind.entity().into(),
            identifier: name.into(),
        }),
        409 => Err(conflict(kind, name)),
        _ => Err(unexpected(
            resp,
            &format!("upload of {} {name} failed", kind.entity()),
        )),
    }
}

fn conflict(kind: Kind, name: &str) -> CoreError {
    CoreError::Conflict {
        entity_type: kind.entity().into(),
        identifier: name.into(),
    }
}
