//! Shared HTTP plumbing: one client per run, explicit timeout, bounded retry.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::HttpConfig;
use crate::error::{Error, Result};

/// JSON GET client shared by both remote APIs
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_attempts: u32,
    retry_delay: Duration,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("could not build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_attempts: config.max_attempts.max(1),
            retry_delay: config.retry_delay(),
        })
    }

    /// GET `url` and decode the JSON body, retrying transient failures.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.get_once(url).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempts < self.max_attempts => {
                    warn!(
                        "Request failed (attempt {}/{}): {}",
                        attempts, self.max_attempts, e
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| Error::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| Error::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Append query parameters to a base URL, percent-encoding values.
pub fn build_url(base: &str, params: &[(&str, String)]) -> Result<Url> {
    let mut url =
        Url::parse(base).map_err(|e| Error::Config(format!("invalid URL '{}': {}", base, e)))?;
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}
