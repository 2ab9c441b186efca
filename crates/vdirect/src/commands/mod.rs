//! Command handlers, one module per top-level subcommand.

pub mod config_cmd;
pub mod device;
pub mod file;
pub mod template;
pub mod util;
pub mod workflow;

use serde::Serialize;

use vdirect_core::{DeviceTarget, Session};

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

/// Resolved settings shared by handlers that talk to vDirect.
pub struct Context<'a> {
    pub global: &'a GlobalOpts,
    pub config: &'a Config,
    pub profile: &'a Profile,
}

impl Context<'_> {
    /// The device the command targets.
    pub fn device(&self) -> Result<DeviceTarget, CliError> {
        config::resolve_device(self.global, self.profile)
    }

    /// Render and print a command result.
    pub fn emit<T: Serialize + ?Sized>(&self, data: &T) -> Result<(), CliError> {
        let rendered = output::render(self.global.output, data)?;
        output::print_output(&rendered, self.global.quiet);
        Ok(())
    }
}

/// Route a connected command to its handler.
pub async fn dispatch(cmd: Command, session: &Session, ctx: &Context<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Template(args) => template::handle(args, session, ctx).await,
        Command::File(args) => file::handle(args, session, ctx).await,
        Command::Workflow(args) => workflow::handle(args, session, ctx).await,
        Command::Commit => device::commit(session, ctx).await,
        Command::Diff => device::diff(session, ctx).await,
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
