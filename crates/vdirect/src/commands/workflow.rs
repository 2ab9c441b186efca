//! Workflow command handlers.

use vdirect_core::{Session, WorkflowOptions, WorkflowTarget};

use crate::cli::{SyncArgs, WorkflowArgs, WorkflowCommand};
use crate::config;
use crate::error::CliError;

use super::{Context, util};

fn options(sync: &SyncArgs, ctx: &Context<'_>) -> WorkflowOptions {
    WorkflowOptions {
        completion: config::completion(sync, &ctx.config.defaults),
        check_mode: ctx.global.check,
    }
}

pub async fn handle(args: WorkflowArgs, session: &Session, ctx: &Context<'_>) -> Result<(), CliError> {
    let outcome = match args.command {
        WorkflowCommand::Create {
            workflow,
            template,
            params,
            sync,
        } => {
            let values = util::collect_params(&params)?;
            session
                .create_workflow(&template, &workflow, values, options(&sync, ctx))
                .await?
        }

        WorkflowCommand::Action {
            workflow,
            action,
            params,
            sync,
        } => {
            let values = util::collect_params(&params)?;
            session
                .run_action(&workflow, &action, values, options(&sync, ctx))
                .await?
        }

        WorkflowCommand::Delete { workflow, sync } => {
            session.delete_workflow(&workflow, options(&sync, ctx)).await?
        }

        WorkflowCommand::Describe {
            template,
            workflow,
            action,
        } => {
            let target = match (template.as_deref(), workflow.as_deref(), action.as_deref()) {
                (Some(template), _, _) => WorkflowTarget::Create { template },
                (None, Some(workflow), Some(action)) => WorkflowTarget::Action { workflow, action },
                _ => {
                    return Err(CliError::Validation {
                        field: "describe".into(),
                        reason: "pass --template, or --workflow with --action".into(),
                    });
                }
            };
            session.describe_workflow(target).await?
        }
    };

    ctx.emit(&outcome)
}
