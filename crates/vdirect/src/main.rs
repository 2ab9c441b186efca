mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vdirect_core::Session;

use crate::cli::{Cli, Command};
use crate::commands::Context;
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a vDirect connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "vdirect", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let cfg = config::load_config_or_default();
            let (profile_name, profile) = config::effective_profile(&cli.global, &cfg)?;
            let client_config =
                config::resolve_client_config(&cli.global, &cfg, &profile_name, &profile)?;

            let session = Session::establish(&client_config)
                .await
                .map_err(|e| with_profile(e.into(), &profile_name))?;

            let ctx = Context {
                global: &cli.global,
                config: &cfg,
                profile: &profile,
            };

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &session, &ctx)
                .await
                .map_err(|e| with_profile(e, &profile_name))
        }
    }
}

/// Name the profile in authentication failures.
fn with_profile(err: CliError, profile_name: &str) -> CliError {
    match err {
        CliError::AuthFailed { .. } => CliError::AuthFailed {
            profile: profile_name.into(),
        },
        other => other,
    }
}
