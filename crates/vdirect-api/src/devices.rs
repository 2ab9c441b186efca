// Managed device endpoints
//
// Commit of pending configuration and configuration diff snapshots. The
// first path segment is the device family (`adc`, `defensePro`, `appWall`).

use tracing::debug;

use crate::client::{ApiResponse, Body, VdirectClient};
use crate::error::Error;

impl VdirectClient {
    /// Apply and save pending configuration on a device.
    ///
    /// `POST api/{family}/{device}/device?action=commit`
    pub async fn commit_device(&self, family: &str, device: &str) -> Result<ApiResponse, Error> {
        let url = self.url_with_query(&["api", family, device, "device"], &[("action", "commit")])?;
        debug!(family, device, "committing device configuration");
        self.post(url, Body::Empty).await
    }

    /// Fetch the current configuration diff of a device as raw text.
    ///
    /// `GET api/{family}/{device}/config?diff=cur`
    pub async fn config_diff(&self, family: &str, device: &str) -> Result<ApiResponse, Error> {
        let url = self.url_with_query(&["api", family, device, "config"], &[("diff", "cur")])?;
        debug!(family, device, "fetching configuration diff");
        self.get(url).await
    }
}
