//! Debounced, cancellable search rounds.
//!
//! One [`Searcher::query`] call is one round: wait out the debounce,
//! compile both query strings, hit the API within a deadline, and shape
//! the rows. Frontends cancel the previous round's token on every
//! keystroke; a cancelled round yields an empty row list rather than an
//! error, since stale results are simply not wanted.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use cql_shorthand::{build_browser_query, build_search_cql};

use crate::client::SearchClient;
use crate::error::{ClientError, SearchError};
use crate::models::SearchResponse;
use crate::rows::{self, ResultRow};
use crate::settings::Settings;

/// Pause after the last keystroke before a round may hit the network.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Lower bound on the network deadline, whatever the settings say.
const MIN_DEADLINE_SECS: u64 = 3;

/// The one call the orchestrator needs from a backend. Tests substitute
/// canned implementations for the HTTP client.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search_cql(&self, cql: &str, limit: u32) -> Result<SearchResponse, ClientError>;
}

#[async_trait]
impl SearchBackend for SearchClient {
    async fn search_cql(&self, cql: &str, limit: u32) -> Result<SearchResponse, ClientError> {
        SearchClient::search_cql(self, cql, limit).await
    }
}

/// Runs search rounds against a backend.
pub struct Searcher<B: SearchBackend> {
    backend: B,
    settings: Settings,
}

impl Searcher<SearchClient> {
    /// Searcher over the real HTTP client.
    pub fn new(settings: Settings) -> Result<Self, ClientError> {
        let backend = SearchClient::new(&settings)?;
        Ok(Self { backend, settings })
    }
}

impl<B: SearchBackend> Searcher<B> {
    /// Searcher over an arbitrary backend.
    pub fn with_backend(backend: B, settings: Settings) -> Self {
        Self { backend, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one debounced round. Returns an empty list when `cancel`
    /// fires during the debounce or the network wait; a blank query
    /// yields the syntax hints instead of searching.
    pub async fn query(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ResultRow>, SearchError> {
        tokio::select! {
            _ = tokio::time::sleep(DEBOUNCE) => {}
            _ = cancel.cancelled() => {
                tracing::debug!("Round cancelled while debouncing");
                return Ok(Vec::new());
            }
        }

        tokio::select! {
            result = self.search_once(text) => result,
            _ = cancel.cancelled() => {
                tracing::debug!("Round cancelled while searching");
                Ok(Vec::new())
            }
        }
    }

    /// Run one round immediately, with no debounce and no cancellation.
    /// The network wait is still bounded by the configured deadline.
    pub async fn search_once(&self, text: &str) -> Result<Vec<ResultRow>, SearchError> {
        if text.trim().is_empty() {
            return Ok(rows::hint_rows());
        }

        let cql = build_search_cql(text, &self.settings.default_spaces);
        let browser_query = build_browser_query(text, &self.settings.default_spaces);
        tracing::debug!("CQL: {}", cql);
        tracing::debug!("Browser query: {}", browser_query);

        let deadline = Duration::from_secs(self.settings.timeout_secs.max(MIN_DEADLINE_SECS));
        let search = self.backend.search_cql(&cql, self.settings.max_results);
        let response = match tokio::time::timeout(deadline, search).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(SearchError::Timeout),
        };

        Ok(self.shape_rows(text, &cql, &browser_query, response))
    }

    fn shape_rows(
        &self,
        original_query: &str,
        cql: &str,
        browser_query: &str,
        response: SearchResponse,
    ) -> Vec<ResultRow> {
        let mut shaped: Vec<ResultRow> = response
            .results
            .iter()
            .take(self.settings.max_results as usize)
            .map(|item| rows::page_row(item, &self.settings, cql))
            .collect();

        let tail_title = if response.results.is_empty() {
            "No results. Open search in browser ..."
        } else {
            "More results in browser ..."
        };
        shaped.push(rows::open_in_browser_row(
            tail_title,
            original_query,
            browser_query,
            &self.settings,
        ));
        shaped
    }
}
