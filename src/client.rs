//! USGS FDSN event service client.
//!
//! Provides blocking HTTP access to the earthquake query endpoint.
//! Uses reqwest with rustls for TLS.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, instrument};

use crate::errors::QuakeMapError;
use crate::models::FeatureCollection;
use crate::query::QuerySpec;

/// Default request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent string for API requests.
const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));

/// USGS base URL for the FDSN event service.
const USGS_BASE_URL: &str = "https://earthquake.usgs.gov";

/// Client for the USGS event query API.
pub struct FdsnClient {
    client: Client,
    base_url: String,
}

impl FdsnClient {
    /// Create a new query client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, QuakeMapError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: USGS_BASE_URL.to_string(),
        })
    }

    /// Fetch the events matching a query as GeoJSON.
    ///
    /// One request, no retries; a transient failure surfaces to the
    /// caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the query is malformed, the request fails,
    /// or the response cannot be parsed.
    #[instrument(skip(self, spec))]
    pub fn fetch_events(&self, spec: &QuerySpec) -> Result<FeatureCollection, QuakeMapError> {
        let url = format!("{}/fdsnws/event/1/query", self.base_url);
        let params = spec.to_params().map_err(QuakeMapError::Validation)?;

        debug!("querying {} with {} parameters", url, params.len());

        let response = self.client.get(&url).query(&params).send()?;

        // Check status before parsing
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(QuakeMapError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let collection: FeatureCollection = response.json()?;

        // Validate response structure
        collection.validate()?;

        debug!("fetched {} events", collection.features.len());
        Ok(collection)
    }
}
