//! HTTP client for the Confluence content search endpoint.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;

use crate::error::ClientError;
use crate::models::SearchResponse;
use crate::settings::Settings;

/// Subtrees expanded on every hit; the row builders read them.
const SEARCH_EXPAND: &str = "content.history.lastUpdated";

/// Bounds on the HTTP timeout, whatever the settings say.
const MIN_TIMEOUT_SECS: u64 = 3;
const MAX_TIMEOUT_SECS: u64 = 30;

/// Client for `/wiki/rest/api/search`.
pub struct SearchClient {
    client: Client,
    base_url: String,
}

impl SearchClient {
    /// Build a client from settings. Credentials go into a Basic
    /// authorization header; an empty token means anonymous access.
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        let timeout = settings.timeout_secs.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if !settings.api_token.is_empty() {
            let credentials = STANDARD.encode(settings.api_token.as_bytes());
            let value = HeaderValue::from_str(&format!("Basic {credentials}")).map_err(|e| {
                ClientError::RequestFailed {
                    message: e.to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::RequestFailed {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
        })
    }

    /// Run one CQL search.
    ///
    /// A non-success status is terminal and carries the response body;
    /// nothing is retried.
    pub async fn search_cql(&self, cql: &str, limit: u32) -> Result<SearchResponse, ClientError> {
        let url = self.search_url(cql, limit);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Search API returned {}", status);
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| ClientError::Parse {
                message: e.to_string(),
            })
    }

    fn search_url(&self, cql: &str, limit: u32) -> String {
        format!(
            "{}/wiki/rest/api/search?cql={}&limit={}&expand={}",
            self.base_url,
            urlencoding::encode(cql),
            limit,
            SEARCH_EXPAND
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base_url: &str) -> SearchClient {
        let mut settings = Settings::default();
        settings.base_url = base_url.to_string();
        SearchClient::new(&settings).unwrap()
    }

    #[test]
    fn search_url_percent_encodes_the_cql() {
        let client = client_for("https://wiki.example.org");
        let url = client.search_url(r#"space IN (AAA) AND (title~"test*")"#, 10);
        assert_eq!(
            url,
            "https://wiki.example.org/wiki/rest/api/search?cql=space%20IN%20%28AAA%29%20AND%20%28title~%22test%2A%22%29&limit=10&expand=content.history.lastUpdated"
        );
    }

    #[test]
    fn client_accepts_an_empty_token() {
        let mut settings = Settings::default();
        settings.api_token = String::new();
        assert!(SearchClient::new(&settings).is_ok());
    }

    #[test]
    fn client_accepts_credentials() {
        let mut settings = Settings::default();
        settings.api_token = "user@example.com:secret".to_string();
        assert!(SearchClient::new(&settings).is_ok());
    }
}
