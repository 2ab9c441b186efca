//! File upload handlers: configuration templates and workflow archives.

use vdirect_core::{Session, UploadOptions, read_template_source, read_workflow_archive};

use crate::cli::{FileArgs, FileCommand};
use crate::error::CliError;

use super::Context;

pub async fn handle(args: FileArgs, session: &Session, ctx: &Context<'_>) -> Result<(), CliError> {
    let check_mode = ctx.global.check;

    let outcome = match args.command {
        FileCommand::Template {
            name,
            file,
            overwrite,
        } => {
            let source = read_template_source(&file)?;
            let options = UploadOptions {
                overwrite,
                check_mode,
            };
            session.upload_template(&name, source, options).await?
        }

        FileCommand::Workflow { archive, overwrite } => {
            let archive = read_workflow_archive(&archive)?;
            tracing::debug!(workflow_template = %archive.name, "read workflow archive");
            let options = UploadOptions {
                overwrite,
                check_mode,
            };
            session.upload_workflow_archive(archive, options).await?
        }
    };

    ctx.emit(&outcome)
}
