// vdirect-api: Async Rust client for the vDirect REST API

pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod system;
pub mod templates;
pub mod transport;
pub mod workflows;

pub use client::{ApiResponse, Credentials, VdirectClient};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
