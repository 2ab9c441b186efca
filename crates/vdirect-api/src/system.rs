// System endpoints
//
// HA role probe and service metadata. Both are public: they are called
// before the session is established and never carry credentials.

use reqwest::Method;
use tracing::debug;

use crate::client::{ApiResponse, Auth, Body, VdirectClient};
use crate::error::Error;
use crate::models::ServiceInfo;

impl VdirectClient {
    /// Probe whether this endpoint is the active HA member.
    ///
    /// `GET api/ha/active` — the active instance answers 204.
    pub async fn probe_ha_active(&self) -> Result<ApiResponse, Error> {
        let url = self.url(&["api", "ha", "active"])?;
        debug!("probing HA role at {}", url);
        self.send(Method::GET, url, Body::Empty, Auth::Anonymous)
            .await
    }

    /// Fetch service metadata.
    ///
    /// `GET api`
    pub async fn service_info(&self) -> Result<ServiceInfo, Error> {
        let url = self.url(&["api"])?;
        debug!("fetching service metadata");
        self.send(Method::GET, url, Body::Empty, Auth::Anonymous)
            .await?
            .error_for_status()?
            .json()
    }
}
