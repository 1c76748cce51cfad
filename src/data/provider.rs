//! Fetching of the two static documents the page is built from.
//!
//! Both fetches are independent: callers start them side by side and must
//! not assume which resolves first, or whether either resolves before the map
//! has loaded. Nothing here retries or caches.

use crate::{
    core::config::DataConfig,
    data::records::{parse_country_document, parse_polygon_document, CountryRecord, PolygonRecord},
    Result,
};
use async_trait::async_trait;

/// Source of country metadata and polygon records.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait DataProvider {
    async fn fetch_country_data(&self) -> Result<Vec<CountryRecord>>;

    async fn fetch_polygon_data(&self) -> Result<Vec<PolygonRecord>>;
}

/// Reads the documents over HTTP GET.
///
/// In the browser, requests go through `fetch`, which needs absolute URLs, so
/// set [`DataConfig::base_url`] to the page origin there.
#[derive(Debug, Clone)]
pub struct HttpDataProvider {
    client: reqwest::Client,
    config: DataConfig,
}

impl HttpDataProvider {
    pub fn new(config: DataConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        log::debug!("GET {} -> {} bytes", url, body.len());
        Ok(body)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl DataProvider for HttpDataProvider {
    async fn fetch_country_data(&self) -> Result<Vec<CountryRecord>> {
        let body = self.get_text(&self.config.country_url()).await?;
        parse_country_document(&body)
    }

    async fn fetch_polygon_data(&self) -> Result<Vec<PolygonRecord>> {
        let body = self.get_text(&self.config.polygon_url()).await?;
        parse_polygon_document(&body)
    }
}

/// Serves documents held in memory; used for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct StaticDataProvider {
    country_json: String,
    polygon_json: String,
}

impl StaticDataProvider {
    pub fn new(country_json: impl Into<String>, polygon_json: impl Into<String>) -> Self {
        Self {
            country_json: country_json.into(),
            polygon_json: polygon_json.into(),
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl DataProvider for StaticDataProvider {
    async fn fetch_country_data(&self) -> Result<Vec<CountryRecord>> {
        parse_country_document(&self.country_json)
    }

    async fn fetch_polygon_data(&self) -> Result<Vec<PolygonRecord>> {
        parse_polygon_document(&self.polygon_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapError;

    #[tokio::test]
    async fn test_static_provider_serves_both_documents() {
        let provider = StaticDataProvider::new(
            r#"{"data": [{"code": "NOR", "name": "Norway", "hdi": 0.957}]}"#,
            r#"[{"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}]"#,
        );

        let (countries, polygons) =
            futures::join!(provider.fetch_country_data(), provider.fetch_polygon_data());

        assert_eq!(countries.unwrap()[0].code, "NOR");
        assert_eq!(polygons.unwrap()[0].geometry_type, "Polygon");
    }

    #[tokio::test]
    async fn test_static_provider_surfaces_parse_errors() {
        let provider = StaticDataProvider::new("not json", "[]");

        let countries = provider.fetch_country_data().await;
        assert!(matches!(countries, Err(MapError::Serialization(_))));
        assert!(provider.fetch_polygon_data().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_http_provider_reports_transport_errors() {
        let provider = HttpDataProvider::new(DataConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..DataConfig::default()
        });

        let result = provider.fetch_country_data().await;
        assert!(matches!(result, Err(MapError::Network(_))));
    }
}
