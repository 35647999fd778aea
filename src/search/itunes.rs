use super::SearchClient;
use crate::domain::{CatalogEntry, CatalogError, Result};
use crate::SearchConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const MEDIA: &str = "software";
const ENTITY: &str = "software";

/// A client for the iTunes Search API, restricted to software.
pub struct ItunesClient {
    endpoint: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchEnvelope {
    #[serde(default)]
    #[allow(dead_code)]
    result_count: usize,
    results: Vec<CatalogEntry>,
}

impl ItunesClient {
    /// Builds a client from the search section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is blank or the HTTP client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(CatalogError::Config("search endpoint is empty".to_string()));
        }

        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            endpoint: config.endpoint.clone(),
            http: builder.build()?,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SearchClient for ItunesClient {
    async fn search(&self, term: &str) -> Result<Vec<CatalogEntry>> {
        tracing::debug!(term = %term, endpoint = %self.endpoint, "querying catalog");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("term", term), ("media", MEDIA), ("entity", ENTITY)])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let envelope: SearchEnvelope = serde_json::from_str(&body)
            .map_err(|e| CatalogError::Search(format!("malformed catalog response: {e}")))?;

        tracing::debug!(count = envelope.results.len(), "catalog responded");
        Ok(envelope.results)
    }
}

impl std::fmt::Debug for ItunesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItunesClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_decodes_results_in_order() {
        let body = r#"{"resultCount": 2, "results": [
            {"trackId": 1, "trackName": "App A", "formattedPrice": "Free"},
            {"trackId": 2, "trackName": "App B", "formattedPrice": "$1.99"}
        ]}"#;
        let envelope: SearchEnvelope = serde_json::from_str(body).unwrap();
        let names: Vec<_> = envelope.results.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["App A", "App B"]);
    }

    #[test]
    fn blank_endpoint_is_a_config_error() {
        let config = SearchConfig {
            endpoint: "  ".to_string(),
            ..SearchConfig::default()
        };
        assert!(matches!(
            ItunesClient::from_config(&config),
            Err(CatalogError::Config(_))
        ));
    }
}
