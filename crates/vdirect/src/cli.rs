//! Clap derive structures for the `vdirect` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// vdirect -- run Radware vDirect templates and workflows
#[derive(Debug, Parser)]
#[command(
    name = "vdirect",
    version,
    about = "Run Radware vDirect templates and workflows from the command line",
    long_about = "Drives a Radware vDirect server (or HA pair) over its REST API:\n\
        uploads configuration templates and workflow archives, runs templates\n\
        against Alteon and DefensePro devices, manages workflows, and commits\n\
        device configuration.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "VDIRECT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Primary vDirect address (overrides profile)
    #[arg(long, env = "VDIRECT_IP", global = true)]
    pub vdirect_ip: Option<String>,

    /// Secondary vDirect address of an HA pair
    #[arg(long, env = "VDIRECT_SECONDARY_IP", global = true)]
    pub secondary_vdirect_ip: Option<String>,

    /// vDirect REST port [default: 2189]
    #[arg(long, env = "VDIRECT_PORT", global = true)]
    pub port: Option<u16>,

    /// URL scheme [default: https]
    #[arg(long, global = true)]
    pub scheme: Option<SchemeArg>,

    /// vDirect user
    #[arg(long, short = 'u', env = "VDIRECT_USERNAME", global = true)]
    pub username: Option<String>,

    /// vDirect password (prefer the keyring or VDIRECT_PASSWORD)
    #[arg(long, global = true, hide = true)]
    pub password: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "VDIRECT_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 180]
    #[arg(long, env = "VDIRECT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Type of the target device
    #[arg(long, env = "VDIRECT_DEVICE_TYPE", global = true)]
    pub device_type: Option<DeviceTypeArg>,

    /// Name of the target device as registered in vDirect
    #[arg(long, short = 'd', env = "VDIRECT_DEVICE_NAME", global = true)]
    pub device_name: Option<String>,

    /// Validate and dry-run only; nothing is changed
    #[arg(long, global = true)]
    pub check: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VDIRECT_OUTPUT",
        default_value = "json",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemeArg {
    Http,
    Https,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DeviceTypeArg {
    Alteon,
    #[value(name = "defensepro", alias = "defensePro")]
    DefensePro,
    #[value(name = "appwall", alias = "appWall")]
    AppWall,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run or describe configuration templates
    #[command(alias = "t")]
    Template(TemplateArgs),

    /// Upload configuration templates and workflow archives
    #[command(alias = "f")]
    File(FileArgs),

    /// Create workflows, run their actions, delete them
    #[command(alias = "wf")]
    Workflow(WorkflowArgs),

    /// Commit pending configuration on the target device
    Commit,

    /// Show the pending configuration diff of the target device (Alteon)
    Diff,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Parameter values for templates and workflow actions.
#[derive(Debug, Args)]
pub struct ParamArgs {
    /// Parameter as KEY=VALUE; VALUE is text unless it opens with [, { or " (then JSON)
    #[arg(long = "param", short = 'P', value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// JSON or YAML file with a parameter object (--param entries win)
    #[arg(long, value_name = "FILE")]
    pub params_file: Option<PathBuf>,
}

/// How to wait for asynchronous workflow operations.
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Return as soon as vDirect accepts the request
    #[arg(long, conflicts_with = "async_delay")]
    pub no_sync: bool,

    /// Seconds between status polls
    #[arg(long, value_name = "SECS")]
    pub async_delay: Option<u64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TEMPLATES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub command: TemplateCommand,
}

#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// Run a configuration template against the target device
    Run {
        /// Template name
        name: String,

        #[command(flatten)]
        params: ParamArgs,

        /// Commit device configuration after a successful run
        #[arg(long)]
        commit: bool,
    },

    /// Describe the parameters a template accepts
    Describe {
        /// Template name
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FILES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FileArgs {
    #[command(subcommand)]
    pub command: FileCommand,
}

#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Upload a configuration template (Velocity source)
    Template {
        /// Template name on the server
        name: String,

        /// Local source file
        #[arg(long, short = 'f', value_name = "FILE")]
        file: PathBuf,

        /// Replace the template if it exists
        #[arg(long)]
        overwrite: bool,
    },

    /// Upload a workflow template archive (zip with workflow.xml)
    Workflow {
        /// Local archive file
        archive: PathBuf,

        /// Replace the workflow template if it exists
        #[arg(long)]
        overwrite: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WORKFLOWS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WorkflowArgs {
    #[command(subcommand)]
    pub command: WorkflowCommand,
}

#[derive(Debug, Subcommand)]
pub enum WorkflowCommand {
    /// Create a workflow from a workflow template
    Create {
        /// Name of the new workflow
        workflow: String,

        /// Workflow template to instantiate
        #[arg(long, short = 't')]
        template: String,

        #[command(flatten)]
        params: ParamArgs,

        #[command(flatten)]
        sync: SyncArgs,
    },

    /// Run an action on a workflow
    Action {
        /// Workflow name
        workflow: String,

        /// Action name
        action: String,

        #[command(flatten)]
        params: ParamArgs,

        #[command(flatten)]
        sync: SyncArgs,
    },

    /// Delete a workflow
    Delete {
        /// Workflow name
        workflow: String,

        #[command(flatten)]
        sync: SyncArgs,
    },

    /// Describe the parameters of a workflow creation or action
    #[command(group(ArgGroup::new("target").required(true).args(["template", "workflow"])))]
    Describe {
        /// Workflow template (describes createWorkflow)
        #[arg(long, short = 't')]
        template: Option<String>,

        /// Workflow whose action to describe
        #[arg(long, requires = "action")]
        workflow: Option<String>,

        /// Action name
        #[arg(long, requires = "workflow")]
        action: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
