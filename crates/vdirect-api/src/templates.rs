// Configuration template endpoints
//
// CRUD on `api/template`, source upload/download and execution.

use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use crate::client::{ApiResponse, Body, TEMPLATE_PARAMETERS, VELOCITY_SOURCE, VdirectClient};
use crate::error::Error;

impl VdirectClient {
    /// Fetch a template resource (validity, devices, parameters).
    ///
    /// `GET api/template/{name}` — 404 when the template does not exist.
    pub async fn get_template(&self, name: &str) -> Result<ApiResponse, Error> {
        let url = self.url(&["api", "template", name])?;
        self.get(url).await
    }

    /// Create a template from Velocity source.
    ///
    /// `POST api/template?name={name}&failIfInvalid=true`
    pub async fn create_template(&self, name: &str, source: Bytes) -> Result<ApiResponse, Error> {
        let url = self.url_with_query(
            &["api", "template"],
            &[("name", name), ("failIfInvalid", "true")],
        )?;
        debug!(template = name, "creating template");
        self.post(
            url,
            Body::Raw {
                data: source,
                content_type: VELOCITY_SOURCE,
            },
        )
        .await
    }

    /// Replace the Velocity source of an existing template.
    ///
    /// `PUT api/template/{name}/source?failIfInvalid=true`
    pub async fn update_template_source(
        &self,
        name: &str,
        source: Bytes,
    ) -> Result<ApiResponse, Error> {
        let url = self.url_with_query(
            &["api", "template", name, "source"],
            &[("failIfInvalid", "true")],
        )?;
        debug!(template = name, "replacing template source");
        self.put(
            url,
            Body::Raw {
                data: source,
                content_type: VELOCITY_SOURCE,
            },
        )
        .await
    }

    /// Download the Velocity source of a template.
    ///
    /// `GET api/template/{name}/source`
    pub async fn template_source(&self, name: &str) -> Result<Bytes, Error> {
        let url = self.url(&["api", "template", name, "source"])?;
        let resp = self.get(url).await?.error_for_status()?;
        Ok(resp.bytes().clone())
    }

    /// Execute a template against its bound device.
    ///
    /// `POST api/template/{name}` with a template-parameters payload.
    pub async fn run_template(
        &self,
        name: &str,
        payload: &(impl Serialize + Sync),
    ) -> Result<ApiResponse, Error> {
        let url = self.url(&["api", "template", name])?;
        debug!(template = name, "executing template");
        self.post(url, Body::json(payload, TEMPLATE_PARAMETERS)?)
            .await
    }
}
