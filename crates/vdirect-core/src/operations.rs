//! Operations a [`Session`](crate::Session) runs against vDirect.
//!
//! Each submodule adds an `impl Session` block; every operation returns an
//! [`Outcome`](crate::Outcome) or a [`CoreError`](crate::CoreError).

mod devices;
mod templates;
mod uploads;
mod workflows;

pub use templates::TemplateOptions;
pub use uploads::UploadOptions;
pub use workflows::{WorkflowOptions, WorkflowTarget};
