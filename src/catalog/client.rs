//! HTTP client for the catalog search endpoint.

use crate::config::CatalogConfig;
use crate::error::Result;
use crate::http::{build_url, HttpClient};

use super::CatalogPage;

/// One page request against the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogQuery<'a> {
    pub text: &'a str,
    pub page: usize,
    pub size: usize,
}

/// Source of catalog pages. Implemented over HTTP and by in-memory fakes in tests.
#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    async fn search(&self, query: &CatalogQuery<'_>) -> Result<CatalogPage>;
}

/// Client for `api.nb.no/catalog/v1/items`, restricted to image media
pub struct NbCatalogClient {
    http: HttpClient,
    base_url: String,
    media_filter: String,
}

impl NbCatalogClient {
    pub fn new(http: HttpClient, config: &CatalogConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            media_filter: config.media_filter.clone(),
        }
    }
}

impl CatalogApi for NbCatalogClient {
    async fn search(&self, query: &CatalogQuery<'_>) -> Result<CatalogPage> {
        let url = build_url(
            &self.base_url,
            &[
                ("q", query.text.to_string()),
                ("filter", self.media_filter.clone()),
                ("page", query.page.to_string()),
                ("size", query.size.to_string()),
            ],
        )?;

        self.http.get_json(&url).await
    }
}
