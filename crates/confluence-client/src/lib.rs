//! Confluence quick-search client.
//!
//! Compiles sigil shorthand (via [`cql_shorthand`]) into CQL, runs the
//! search against the Confluence content search REST API, and shapes
//! launcher-style result rows: page hits first, then a tail action that
//! reruns the search in the web UI. An empty query yields syntax hints.
//!
//! The library renders nothing and opens nothing; frontends decide what
//! a row activation means. The `confluence` binary (feature `cli`) is
//! one such frontend.

pub mod client;
pub mod error;
pub mod models;
pub mod rows;
pub mod search;
pub mod settings;

pub use client::SearchClient;
pub use error::{ClientError, SearchError};
pub use models::{SearchItem, SearchResponse};
pub use rows::{ResultRow, RowKind};
pub use search::{SearchBackend, Searcher, DEBOUNCE};
pub use settings::{Settings, SettingsError};
