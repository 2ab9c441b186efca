// vDirect HTTP client
//
// Wraps `reqwest::Client` with basic-auth injection, path construction
// under the active endpoint, and status-agnostic responses. Endpoint groups
// (system, templates, workflows, devices) are implemented as inherent
// methods in sibling files to keep this module focused on transport
// mechanics.

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Content type for template and workflow execution payloads.
pub const TEMPLATE_PARAMETERS: &str = "application/vnd.com.radware.vdirect.template-parameters+json";
/// Content type for configuration template (Velocity) source.
pub const VELOCITY_SOURCE: &str = "text/x-velocity";
/// Content type for workflow template archives.
pub const ZIP_ARCHIVE: &str = "application/x-zip-compressed";

/// Basic-auth credentials for the vDirect REST API.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// Whether a request carries the basic-auth header.
///
/// The HA probe and the service metadata endpoint are public.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    Basic,
    Anonymous,
}

/// Request payload variants used by the vDirect endpoints.
pub(crate) enum Body {
    Empty,
    Raw {
        data: Bytes,
        content_type: &'static str,
    },
}

impl Body {
    /// Encode `value` as JSON under a vendor content type.
    pub(crate) fn json(value: &impl Serialize, content_type: &'static str) -> Result<Self, Error> {
        let data = serde_json::to_vec(value).map_err(Error::Serialization)?;
        Ok(Self::Raw {
            data: Bytes::from(data),
            content_type,
        })
    }
}

// ── Response ─────────────────────────────────────────────────────────

/// Status code plus raw body of a completed HTTP exchange.
///
/// The client never fails on a non-success status; each operation in
/// `vdirect-core` interprets the status itself.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Bytes,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Bytes) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Raw body bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Body as text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as `T`, keeping the raw body on failure.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: self.text(),
        })
    }

    /// Decode the body as loose JSON; `None` for empty or non-JSON bodies.
    pub fn json_value(&self) -> Option<serde_json::Value> {
        if self.body.is_empty() {
            return None;
        }
        serde_json::from_slice(&self.body).ok()
    }

    /// Human-readable diagnostic extracted from an error body.
    ///
    /// vDirect error bodies are usually `{"message": "..."}`; anything else
    /// is returned verbatim.
    pub fn detail(&self) -> String {
        self.json_value()
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| self.text(), str::to_owned)
    }

    /// Fail with [`Error::Api`] unless the status is exactly 200.
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.status == StatusCode::OK {
            return Ok(self);
        }
        Err(Error::Api {
            status: self.status.as_u16(),
            message: self.detail(),
            body: self.text(),
        })
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Raw HTTP client for one vDirect endpoint.
///
/// Every authenticated request carries HTTP basic auth. Methods return
/// [`ApiResponse`] regardless of status so callers can distinguish
/// 202 (async accepted) from 200/201/204 and the error classes.
#[derive(Debug, Clone)]
pub struct VdirectClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl VdirectClient {
    /// Create a client rooted at `base_url` (e.g. `https://10.0.0.5:2189/`).
    pub fn new(http: reqwest::Client, mut base_url: Url, credentials: Credentials) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http,
            base_url,
            credentials,
        }
    }

    /// The endpoint root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append percent-encoded path segments to the base URL.
    ///
    /// `url(&["api", "template", name])` → `{base}api/template/{name}`
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Like [`url`](Self::url), with query parameters appended.
    pub(crate) fn url_with_query(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url, Error> {
        let mut url = self.url(segments)?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        body: Body,
        auth: Auth,
    ) -> Result<ApiResponse, Error> {
        debug!("{method} {url}");

        let mut request = self.http.request(method, url);
        if auth == Auth::Basic {
            request = request.basic_auth(
                &self.credentials.username,
                Some(self.credentials.password.expose_secret()),
            );
        }
        if let Body::Raw { data, content_type } = body {
            request = request.header(CONTENT_TYPE, content_type).body(data);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        debug!(status = status.as_u16(), len = body.len(), "response received");

        Ok(ApiResponse::new(status, body))
    }

    pub(crate) async fn get(&self, url: Url) -> Result<ApiResponse, Error> {
        self.send(Method::GET, url, Body::Empty, Auth::Basic).await
    }

    pub(crate) async fn post(&self, url: Url, body: Body) -> Result<ApiResponse, Error> {
        self.send(Method::POST, url, body, Auth::Basic).await
    }

    pub(crate) async fn put(&self, url: Url, body: Body) -> Result<ApiResponse, Error> {
        self.send(Method::PUT, url, body, Auth::Basic).await
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<ApiResponse, Error> {
        self.send(Method::DELETE, url, Body::Empty, Auth::Basic).await
    }
}
