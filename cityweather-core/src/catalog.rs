use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    error::{CatalogError, truncate_body},
    model::CityRecord,
};

pub const DEFAULT_CATALOG_URL: &str = "https://public.opendatasoft.com/api/explore/v2.1/catalog/datasets/geonames-all-cities-with-a-population-1000/records";

/// Window into the catalog requested by one page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

/// Source of paginated city records.
#[async_trait]
pub trait CityCatalog: Send + Sync + Debug {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<CityRecord>, CatalogError>;
}

/// The opendatasoft geonames dataset.
#[derive(Debug, Clone)]
pub struct OpenDataSoftCatalog {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    results: Vec<CityRecord>,
}

impl OpenDataSoftCatalog {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }
}

#[async_trait]
impl CityCatalog for OpenDataSoftCatalog {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<CityRecord>, CatalogError> {
        tracing::debug!(
            limit = request.limit,
            offset = request.offset,
            "requesting city catalog page"
        );

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("limit", request.limit.to_string()),
                ("offset", request.offset.to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: RecordsResponse = serde_json::from_str(&body)?;
        tracing::debug!(count = parsed.results.len(), "city catalog page received");

        Ok(parsed.results)
    }
}
