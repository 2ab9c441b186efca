//! Integration layer between `vdirect-api` and the `vdirect` CLI.
//!
//! - **[`Session`]**: resolves the active member of an HA pair, gates on
//!   the service version and owns the HTTP client. Every operation is a
//!   method on the session.
//!
//! - **Schemas** ([`schema`], [`binding`]): template and workflow-action
//!   schemas normalized into one [`ParameterSchema`], and caller values
//!   validated and coerced against it.
//!
//! - **Execution** ([`request`], [`execution`]): request bodies with device
//!   connections, response classification and polling of asynchronous
//!   operations.
//!
//! - **Devices** ([`family`]): per-family commit and configuration diff,
//!   and how template execution decides whether a device changed.

pub mod archive;
pub mod binding;
pub mod config;
pub mod error;
pub mod execution;
pub mod family;
pub mod operations;
pub mod outcome;
pub mod request;
pub mod schema;
pub mod session;
pub mod version;

// ── Primary re-exports ──────────────────────────────────────────────
pub use archive::{WorkflowArchive, read_template_source, read_workflow_archive};
pub use config::{ClientConfig, DEFAULT_PORT, DEFAULT_TIMEOUT, DeviceTarget, Scheme, TlsVerification};
pub use error::CoreError;
pub use execution::{Completion, DEFAULT_POLL_DELAY};
pub use family::{ChangeDetection, DeviceFamily};
pub use operations::{TemplateOptions, UploadOptions, WorkflowOptions, WorkflowTarget};
pub use outcome::Outcome;
pub use schema::{ParameterDescriptor, ParameterSchema};
pub use session::{ActiveRole, Endpoint, Session};
pub use version::{MIN_SUPPORTED_VERSION, ServiceVersion};
