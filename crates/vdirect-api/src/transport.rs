// HTTP client construction for talking to vDirect.
//
// Connects are bounded separately from whole requests: the HA probe must
// give up quickly on a dead primary. Basic auth is attached per request by
// `VdirectClient`, never here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::error::Error;

/// Upper bound for establishing a TCP/TLS connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How the server certificate is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsMode {
    /// Trust the platform roots.
    System,
    /// Trust the PEM bundle at this path in addition to the platform roots.
    CustomCa(PathBuf),
    /// Skip verification entirely.
    DangerAcceptInvalid,
}

impl TlsMode {
    fn apply(&self, builder: reqwest::ClientBuilder) -> Result<reqwest::ClientBuilder, Error> {
        Ok(match self {
            Self::System => builder,
            Self::CustomCa(path) => builder.add_root_certificate(load_ca(path)?),
            Self::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        })
    }
}

fn load_ca(path: &Path) -> Result<reqwest::Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("cannot read CA bundle {}: {e}", path.display())))?;
    reqwest::Certificate::from_pem(&pem)
        .map_err(|e| Error::Tls(format!("{} is not a PEM certificate: {e}", path.display())))
}

/// Settings for the single HTTP client a session uses.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Whole-request timeout.
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl TransportConfig {
    /// Connect timeout is capped by `timeout` when that is shorter.
    pub fn new(tls: TlsMode, timeout: Duration) -> Self {
        Self {
            tls,
            timeout,
            connect_timeout: timeout.min(CONNECT_TIMEOUT),
        }
    }

    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .default_headers(headers)
            .user_agent(concat!("vdirect-rs/", env!("CARGO_PKG_VERSION")));

        self.tls
            .apply(builder)?
            .build()
            .map_err(|e| Error::Tls(format!("cannot set up vDirect HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_timeout_never_exceeds_request_timeout() {
        let quick = TransportConfig::new(TlsMode::System, Duration::from_secs(3));
        assert_eq!(quick.connect_timeout, Duration::from_secs(3));

        let slow = TransportConfig::new(TlsMode::System, Duration::from_secs(180));
        assert_eq!(slow.connect_timeout, CONNECT_TIMEOUT);
    }

    #[test]
    fn missing_ca_bundle_names_the_path() {
        let config = TransportConfig::new(
            TlsMode::CustomCa(PathBuf::from("/nonexistent/vdirect-ca.pem")),
            Duration::from_secs(5),
        );
        match config.build_client() {
            Err(Error::Tls(msg)) => assert!(msg.contains("/nonexistent/vdirect-ca.pem"), "{msg}"),
            other => panic!("expected TLS error, got {other:?}"),
        }
    }

    #[test]
    fn insecure_mode_builds() {
        let config = TransportConfig::new(TlsMode::DangerAcceptInvalid, Duration::from_secs(5));
        assert!(config.build_client().is_ok());
    }
}
