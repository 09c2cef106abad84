//! HTTP client for the Geonorge place-name search.

use crate::config::PlaceNameConfig;
use crate::error::Result;
use crate::http::{build_url, HttpClient};

use super::PlaceNameResponse;

/// Fuzzy place-name search. Implemented over HTTP and by fakes in tests.
#[allow(async_fn_in_trait)]
pub trait PlaceNameApi {
    async fn search(&self, text: &str) -> Result<PlaceNameResponse>;
}

pub struct GeonorgeClient {
    http: HttpClient,
    base_url: String,
    epsg: u32,
    fuzzy: bool,
    hits_per_page: u32,
}

impl GeonorgeClient {
    pub fn new(http: HttpClient, config: &PlaceNameConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            epsg: config.epsg,
            fuzzy: config.fuzzy,
            hits_per_page: config.hits_per_page,
        }
    }

    fn params(&self, text: &str) -> Vec<(&'static str, String)> {
        vec![
            ("sok", text.to_string()),
            ("fuzzy", self.fuzzy.to_string()),
            ("utkoordsys", self.epsg.to_string()),
            ("treffPerSide", self.hits_per_page.to_string()),
            ("side", "1".to_string()),
        ]
    }
}

impl PlaceNameApi for GeonorgeClient {
    async fn search(&self, text: &str) -> Result<PlaceNameResponse> {
        let url = build_url(&self.base_url, &self.params(text))?;
        self.http.get_json(&url).await
    }
}
