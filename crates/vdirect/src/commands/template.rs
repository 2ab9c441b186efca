//! Template command handlers.

use vdirect_core::{Session, TemplateOptions};

use crate::cli::{TemplateArgs, TemplateCommand};
use crate::error::CliError;

use super::{Context, util};

pub async fn handle(args: TemplateArgs, session: &Session, ctx: &Context<'_>) -> Result<(), CliError> {
    match args.command {
        TemplateCommand::Run {
            name,
            params,
            commit,
        } => {
            let device = ctx.device()?;
            let values = util::collect_params(&params)?;
            let options = TemplateOptions {
                check_mode: ctx.global.check,
                commit,
            };
            let outcome = session.run_template(&name, &device, values, options).await?;
            ctx.emit(&outcome)
        }

        TemplateCommand::Describe { name } => {
            let outcome = session.describe_template(&name).await?;
            ctx.emit(&outcome)
        }
    }
}
