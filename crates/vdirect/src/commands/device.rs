//! Device-level handlers: commit and pending configuration diff.

use serde_json::json;

use vdirect_core::Session;

use crate::error::CliError;

use super::Context;

pub async fn commit(session: &Session, ctx: &Context<'_>) -> Result<(), CliError> {
    let device = ctx.device()?;
    let outcome = session.commit(&device, ctx.global.check).await?;
    ctx.emit(&outcome)
}

pub async fn diff(session: &Session, ctx: &Context<'_>) -> Result<(), CliError> {
    let device = ctx.device()?;
    let raw = session.config_diff(&device).await?;
    let text = String::from_utf8_lossy(&raw);
    ctx.emit(&json!({ "diff": text }))
}
