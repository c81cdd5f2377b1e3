use crate::error::TrendsResult;

#[cfg(feature = "http-source")]
use crate::error::TrendsError;

/// Default endpoint serving the district-level daily feed.
pub const DEFAULT_DATASET_ENDPOINT: &str = "https://mapa.covid.chat/map_data/daily";

/// Provider of the raw daily feed payload.
///
/// The engine treats a fetch as one blocking step; hosts with async I/O can
/// fetch on their own and hand the payload to `TrendsEngine::load_raw_json`.
pub trait DatasetSource {
    fn fetch_raw(&mut self) -> TrendsResult<String>;
}

/// In-memory payload, used by tests and by hosts that cache the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticSource {
    payload: String,
}

impl StaticSource {
    #[must_use]
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

impl DatasetSource for StaticSource {
    fn fetch_raw(&mut self) -> TrendsResult<String> {
        Ok(self.payload.clone())
    }
}

/// Blocking GET against a JSON endpoint.
#[cfg(feature = "http-source")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    endpoint: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http-source")]
impl HttpSource {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(feature = "http-source")]
impl Default for HttpSource {
    fn default() -> Self {
        Self::new(DEFAULT_DATASET_ENDPOINT)
    }
}

#[cfg(feature = "http-source")]
impl DatasetSource for HttpSource {
    fn fetch_raw(&mut self) -> TrendsResult<String> {
        tracing::debug!(endpoint = %self.endpoint, "fetching raw dataset");
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .map_err(|e| TrendsError::Fetch(format!("request to {} failed: {e}", self.endpoint)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TrendsError::Fetch(format!(
                "{} answered with status {status}",
                self.endpoint
            )));
        }
        response
            .text()
            .map_err(|e| TrendsError::Fetch(format!("failed to read response body: {e}")))
    }
}
