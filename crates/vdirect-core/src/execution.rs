// ── Execution engine ──
//
// Classifies the response to a run/create/action/delete request and, for
// asynchronous operations, polls the status URI until the service
// reports completion.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use vdirect_api::ApiResponse;
use vdirect_api::models::AsyncStatus;

use crate::error::CoreError;
use crate::session::{Session, unexpected};

/// Default delay between status polls.
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_secs(2);

// ── Operations ───────────────────────────────────────────────────────

/// A request whose response the engine classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation<'a> {
    RunTemplate { template: &'a str },
    CreateWorkflow { template: &'a str, workflow: &'a str },
    RunAction { workflow: &'a str, action: &'a str },
    DeleteWorkflow { workflow: &'a str },
}

impl Operation<'_> {
    fn not_found(self) -> CoreError {
        let (entity_type, identifier) = match self {
            Self::RunTemplate { template } => ("template", template),
            Self::CreateWorkflow { template, .. } => ("workflow template", template),
            Self::RunAction { workflow, .. } | Self::DeleteWorkflow { workflow } => {
                ("workflow", workflow)
            }
        };
        CoreError::NotFound {
            entity_type: entity_type.into(),
            identifier: identifier.into(),
        }
    }

    /// Only workflow creation can collide with an existing resource.
    fn conflict(self) -> Option<CoreError> {
        match self {
            Self::CreateWorkflow { workflow, .. } => Some(CoreError::Conflict {
                entity_type: "workflow".into(),
                identifier: workflow.into(),
            }),
            _ => None,
        }
    }

    fn label(self) -> String {
        match self {
            Self::RunTemplate { template } => format!("template {template}"),
            Self::CreateWorkflow { workflow, .. } => format!("workflow creation {workflow}"),
            Self::RunAction { workflow, action } => format!("action {action} on workflow {workflow}"),
            Self::DeleteWorkflow { workflow } => format!("deletion of workflow {workflow}"),
        }
    }
}

// ── Results ──────────────────────────────────────────────────────────

/// Classified response of an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    /// 200/201/204: the operation finished synchronously.
    Immediate { output: Option<Value> },
    /// 202: the operation continues server-side.
    Accepted(Accepted),
}

/// An operation accepted for asynchronous processing.
#[derive(Debug, Clone, PartialEq)]
pub struct Accepted {
    /// Status URI as handed out by the service; may be relative.
    pub poll_uri: Option<String>,
    /// Final status when the 202 itself reports the operation complete.
    pub finished: Option<Completed>,
}

/// Final status of an asynchronous operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completed {
    pub success: bool,
    pub messages: Vec<String>,
    pub duration: Option<f64>,
}

impl From<AsyncStatus> for Completed {
    fn from(status: AsyncStatus) -> Self {
        Self {
            success: status.success.unwrap_or(false),
            messages: status.messages,
            duration: status.duration,
        }
    }
}

/// How the caller waits for an accepted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Poll until complete, sleeping `delay` between incomplete polls.
    Wait { delay: Duration },
    /// Return as soon as the service accepts the request.
    FireAndForget,
}

impl Default for Completion {
    fn default() -> Self {
        Self::Wait {
            delay: DEFAULT_POLL_DELAY,
        }
    }
}

/// What the engine hands back to the operation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Finished {
    Immediate(Option<Value>),
    Completed(Completed),
    /// Accepted but not awaited.
    Pending,
}

// ── Classification ───────────────────────────────────────────────────

/// Map a response status to a result or a typed error.
pub fn interpret(operation: Operation<'_>, resp: &ApiResponse) -> Result<ExecutionResult, CoreError> {
    match resp.status_code() {
        200 | 201 | 204 => Ok(ExecutionResult::Immediate {
            output: resp.json_value(),
        }),
        202 => {
            let status: AsyncStatus = resp.json().map_err(|e| CoreError::Service {
                message: format!("unable to parse async status for {}: {e}", operation.label()),
                status: Some(202),
                body: Some(resp.text()),
            })?;
            let poll_uri = status.uri.clone();
            let finished = status.complete.then(|| Completed::from(status));
            Ok(ExecutionResult::Accepted(Accepted { poll_uri, finished }))
        }
        400 => Err(CoreError::InvalidParameters {
            message: format!("request for {} is invalid", operation.label()),
            detail: Some(resp.detail()),
        }),
        404 => Err(operation.not_found()),
        409 => Err(operation
            .conflict()
            .unwrap_or_else(|| unexpected(resp, &format!("{} failed", operation.label())))),
        _ => Err(unexpected(resp, &format!("{} failed", operation.label()))),
    }
}

// ── Polling ──────────────────────────────────────────────────────────

/// Poll an accepted operation until the service reports it complete.
///
/// An operation the 202 already reports complete is not polled. Otherwise
/// the first poll is issued immediately; `delay` is slept only after a
/// poll that reports the operation incomplete. A poll without a `uri`
/// keeps the previous one.
pub async fn await_completion(
    session: &Session,
    accepted: Accepted,
    delay: Duration,
) -> Result<Completed, CoreError> {
    if let Some(completed) = accepted.finished {
        debug!(success = completed.success, "async operation complete on acceptance");
        return Ok(completed);
    }

    let base = session.client().base_url();
    let mut uri = resolve_uri(base, accepted.poll_uri.as_deref())?;
    let mut polls: u32 = 0;

    loop {
        let resp = session.client().poll_status(&uri).await?;
        polls += 1;
        if resp.status_code() != 200 {
            return Err(unexpected(
                &resp,
                &format!("async operation polling failed after {polls} polls"),
            ));
        }

        let status: AsyncStatus = resp.json().map_err(|e| CoreError::Service {
            message: format!("unable to parse async status: {e}"),
            status: Some(200),
            body: Some(resp.text()),
        })?;

        if let Some(next) = status.uri.as_deref() {
            uri = resolve_uri(base, Some(next))?;
        }

        if status.complete {
            debug!(polls, success = ?status.success, "async operation complete");
            return Ok(status.into());
        }

        debug!(polls, uri = %uri, "async operation still running");
        tokio::time::sleep(delay).await;
    }
}

fn resolve_uri(base: &Url, uri: Option<&str>) -> Result<Url, CoreError> {
    let raw = uri.ok_or_else(|| CoreError::Service {
        message: "async operation accepted without a status uri".into(),
        status: Some(202),
        body: None,
    })?;
    base.join(raw).map_err(|e| CoreError::Service {
        message: format!("invalid async status uri '{raw}': {e}"),
        status: None,
        body: None,
    })
}

/// Classify `resp` and wait for it according to `completion`.
pub(crate) async fn finish(
    session: &Session,
    operation: Operation<'_>,
    resp: &ApiResponse,
    completion: Completion,
) -> Result<Finished, CoreError> {
    let accepted = match interpret(operation, resp)? {
        ExecutionResult::Immediate { output } => return Ok(Finished::Immediate(output)),
        ExecutionResult::Accepted(accepted) => accepted,
    };

    let completed = match (completion, accepted.finished.is_some()) {
        (Completion::FireAndForget, false) => {
            info!(operation = %operation.label(), "accepted, not waiting for completion");
            return Ok(Finished::Pending);
        }
        (Completion::FireAndForget, true) => await_completion(session, accepted, Duration::ZERO).await?,
        (Completion::Wait { delay }, _) => await_completion(session, accepted, delay).await?,
    };

    if completed.success {
        Ok(Finished::Completed(completed))
    } else {
        Err(CoreError::OperationFailed {
            message: format!("{} failed", operation.label()),
            log: completed.messages,
            duration: completed.duration,
        })
    }
}
