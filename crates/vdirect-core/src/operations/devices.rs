// ── Managed devices ──
//
// Commit, configuration diff, and the per-family change detection that
// wraps template execution.

use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, info};

use vdirect_api::models::CommitStatus;

use crate::config::DeviceTarget;
use crate::error::CoreError;
use crate::family::ChangeDetection;
use crate::outcome::Outcome;
use crate::request::ExecutionRequest;
use crate::session::{Session, unexpected};

impl Session {
    /// Commit pending configuration on `device`.
    ///
    /// Reports changed when the device had configuration awaiting commit.
    /// In check mode no request is sent.
    pub async fn commit(&self, device: &DeviceTarget, check_mode: bool) -> Result<Outcome, CoreError> {
        if check_mode {
            debug!(device = %device.name, "check mode, commit skipped");
            return Ok(Outcome::unchanged());
        }

        let resp = self
            .client()
            .commit_device(device.family.api_segment(), &device.name)
            .await?;
        if resp.status_code() != 200 {
            return Err(unexpected(&resp, &format!("commit on {} failed", device.name)));
        }

        let status: CommitStatus = resp.json().map_err(|e| CoreError::Service {
            message: format!("unable to parse commit response: {e}"),
            status: Some(200),
            body: Some(resp.text()),
        })?;
        info!(device = %device.name, commit_needed = status.commit_needed, "device committed");
        Ok(Outcome::with_changed(status.commit_needed))
    }

    /// Current configuration diff of `device`, as returned by vDirect.
    ///
    /// Only device families with diff support answer this.
    pub async fn config_diff(&self, device: &DeviceTarget) -> Result<Bytes, CoreError> {
        if !device.family.supports_diff() {
            return Err(CoreError::Unsupported {
                operation: "configuration diff".into(),
                device_type: device.family.to_string(),
            });
        }

        let resp = self
            .client()
            .config_diff(device.family.api_segment(), &device.name)
            .await?;
        if resp.status_code() != 200 {
            return Err(unexpected(
                &resp,
                &format!("unable to fetch configuration diff of {}", device.name),
            ));
        }
        Ok(resp.bytes().clone())
    }

    /// Run a template request and work out whether the device changed.
    ///
    /// Diff-capable families compare the configuration diff taken before
    /// and after the run; the others assume a change unless the request
    /// was a dry run.
    pub(crate) async fn execute_on_device(
        &self,
        device: &DeviceTarget,
        template: &str,
        request: &ExecutionRequest,
    ) -> Result<(Value, bool), CoreError> {
        match device.family.change_detection() {
            ChangeDetection::Diff => {
                let before = self.config_diff(device).await?;
                let output = self.submit_template(template, request).await?;
                let after = self.config_diff(device).await?;
                let changed = before != after;
                debug!(device = %device.name, changed, "configuration diff compared");
                Ok((output, changed))
            }
            ChangeDetection::Assumed => {
                let output = self.submit_template(template, request).await?;
                Ok((output, !request.dry_run))
            }
            ChangeDetection::Unsupported => Err(CoreError::Unsupported {
                operation: "configuration template execution".into(),
                device_type: device.family.to_string(),
            }),
        }
    }
}
