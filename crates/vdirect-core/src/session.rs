// ── Session ──
//
// Resolves which member of an HA pair is active, verifies the service
// version, and holds the resulting client. A `Session` is built once per
// run and borrowed by every operation; nothing here is global.

use tracing::{debug, info, warn};
use url::Url;

use vdirect_api::transport::{TlsMode, TransportConfig};
use vdirect_api::{ApiResponse, Credentials, VdirectClient};

use crate::config::{ClientConfig, Scheme, TlsVerification};
use crate::error::CoreError;
use crate::version::ServiceVersion;

const HA_ACTIVE: u16 = 204;

// ── Endpoint ─────────────────────────────────────────────────────────

/// Which configured address currently serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveRole {
    Primary,
    Secondary,
}

/// Addresses of a vDirect server or HA pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    primary: String,
    secondary: Option<String>,
    port: u16,
    scheme: Scheme,
    active: ActiveRole,
}

impl Endpoint {
    pub fn new(primary: impl Into<String>, secondary: Option<String>, port: u16, scheme: Scheme) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.filter(|s| !s.is_empty()),
            port,
            scheme,
            active: ActiveRole::Primary,
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn secondary(&self) -> Option<&str> {
        self.secondary.as_deref()
    }

    pub fn active(&self) -> ActiveRole {
        self.active
    }

    /// Address of the active member.
    pub fn active_address(&self) -> &str {
        match self.active {
            ActiveRole::Primary => &self.primary,
            ActiveRole::Secondary => self.secondary.as_deref().unwrap_or(&self.primary),
        }
    }

    /// Root URL of the active member, e.g. `https://10.0.0.5:2189/`.
    pub fn base_url(&self) -> Result<Url, CoreError> {
        let raw = format!("{}://{}:{}/", self.scheme, self.active_address(), self.port);
        Url::parse(&raw).map_err(|e| CoreError::Configuration {
            message: format!("invalid vDirect address '{raw}': {e}"),
        })
    }

    /// Switch to the secondary member, if one is configured.
    fn fail_over(&self) -> Option<Self> {
        self.secondary.as_ref()?;
        Some(Self {
            active: ActiveRole::Secondary,
            ..self.clone()
        })
    }
}

// ── Session ──────────────────────────────────────────────────────────

/// An established connection to the active vDirect instance.
#[derive(Debug, Clone)]
pub struct Session {
    client: VdirectClient,
    endpoint: Endpoint,
    version: ServiceVersion,
}

impl Session {
    /// Resolve the active endpoint and verify the service version.
    ///
    /// Issues the HA probe (at most twice) and one metadata request. Build
    /// the session once and pass it by reference to every operation.
    pub async fn establish(config: &ClientConfig) -> Result<Self, CoreError> {
        let http = build_transport(config).build_client()?;
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let endpoint = Endpoint::new(
            config.primary.clone(),
            config.secondary.clone(),
            config.port,
            config.scheme,
        );

        let endpoint = resolve_active_endpoint(&http, &credentials, endpoint).await?;
        let client = VdirectClient::new(http, endpoint.base_url()?, credentials);
        let minimum = ServiceVersion::parse(&config.min_version)?;
        let version = verify_version(&client, &minimum).await?;

        info!(
            address = endpoint.active_address(),
            version = version.raw(),
            "vDirect session established"
        );

        Ok(Self {
            client,
            endpoint,
            version,
        })
    }

    /// Assemble a session from parts resolved elsewhere.
    pub fn from_parts(client: VdirectClient, endpoint: Endpoint, version: ServiceVersion) -> Self {
        Self {
            client,
            endpoint,
            version,
        }
    }

    pub fn client(&self) -> &VdirectClient {
        &self.client
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn version(&self) -> &ServiceVersion {
        &self.version
    }
}

fn build_transport(config: &ClientConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig::new(tls, config.timeout)
}

// ── HA resolution ────────────────────────────────────────────────────

/// Find the active member of an HA pair.
///
/// The primary is probed first. Any answer other than 204 makes the
/// secondary (when configured) the candidate for exactly one more probe.
pub async fn resolve_active_endpoint(
    http: &reqwest::Client,
    credentials: &Credentials,
    endpoint: Endpoint,
) -> Result<Endpoint, CoreError> {
    let status = probe(http, credentials, &endpoint).await?;
    if status == Some(HA_ACTIVE) {
        debug!(address = endpoint.primary(), "primary vDirect is active");
        return Ok(endpoint);
    }

    let Some(secondary) = endpoint.fail_over() else {
        return Err(classify_probe_failure(&endpoint, status));
    };

    warn!(
        primary = endpoint.primary(),
        secondary = secondary.active_address(),
        ?status,
        "primary vDirect not active, trying secondary"
    );

    if probe(http, credentials, &secondary).await? == Some(HA_ACTIVE) {
        return Ok(secondary);
    }

    Err(CoreError::Connectivity {
        url: secondary.active_address().to_owned(),
        reason: "failed to contact vDirect server (neither primary nor secondary is active)".into(),
    })
}

/// HA probe status, or `None` when no HTTP response was received.
async fn probe(
    http: &reqwest::Client,
    credentials: &Credentials,
    endpoint: &Endpoint,
) -> Result<Option<u16>, CoreError> {
    let client = VdirectClient::new(http.clone(), endpoint.base_url()?, credentials.clone());
    match client.probe_ha_active().await {
        Ok(resp) => Ok(Some(resp.status_code())),
        Err(e) => {
            debug!(address = endpoint.active_address(), error = %e, "HA probe failed");
            Ok(None)
        }
    }
}

fn classify_probe_failure(endpoint: &Endpoint, status: Option<u16>) -> CoreError {
    let reason = match status {
        Some(404) => "contacted secondary vDirect instance, primary not supplied".to_owned(),
        Some(500) => "error 500 connecting to vDirect".to_owned(),
        Some(other) => format!("unexpected HA status {other} from vDirect"),
        None => "error connecting to vDirect".to_owned(),
    };
    CoreError::Connectivity {
        url: endpoint.active_address().to_owned(),
        reason,
    }
}

// ── Version gate ─────────────────────────────────────────────────────

/// Fetch the service version and check it against `minimum`.
pub async fn verify_version(
    client: &VdirectClient,
    minimum: &ServiceVersion,
) -> Result<ServiceVersion, CoreError> {
    let info = client.service_info().await?;
    let version = ServiceVersion::parse(&info.version)?;
    debug!(version = %version, minimum = %minimum, "checking vDirect version");

    if !version.meets(minimum) {
        return Err(CoreError::UnsupportedVersion {
            actual: info.version,
            minimum: minimum.to_string(),
        });
    }
    Ok(version)
}

/// Fold a response into a service error carrying its diagnostic body.
pub(crate) fn unexpected(resp: &ApiResponse, context: &str) -> CoreError {
    CoreError::Service {
        message: format!("{context} [{}]", resp.status_code()),
        status: Some(resp.status_code()),
        body: Some(resp.detail()),
    }
}
