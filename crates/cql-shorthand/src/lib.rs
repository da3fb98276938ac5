//! Sigil search shorthand compiled to Confluence CQL.
//!
//! Lightweight sigils mixed into free text narrow a Confluence search:
//!
//! | Sigil | Meaning |
//! |-------|---------|
//! | `#key` | restrict to space `key` (repeatable) |
//! | `#all` | search all spaces, lifting the configured default |
//! | `+label` | restrict to a label (repeatable) |
//! | `@me` | contributed by the signed-in user |
//! | `@name` | contributed by someone matching `name` |
//! | `/` | folders |
//! | `"` | blog posts |
//! | `.` | pages (any single leftover character works) |
//! | `*` | all content types |
//!
//! Tokens no rule claims become free search text; each one turns into a
//! prefix match against title and body. One input compiles to two
//! targets:
//!
//! - [`build_search_cql`], a CQL filter for the content search REST API;
//! - [`build_browser_query`], the query string that reproduces the search
//!   in the Confluence web UI.
//!
//! `roadmap #docs +runbook @me /` becomes
//!
//! ```text
//! space IN (docs) AND type IN(folder) AND label IN (runbook)
//!   AND (contributor = currentUser()) AND (title~"roadmap*" OR text~"roadmap*")
//!   order by lastmodified DESC
//! ```
//!
//! Compilation is an ordered rule pipeline (see [`pipeline`]); rule order
//! decides which rule claims a token, so it is part of the grammar.

pub mod builder;
pub mod escape;
pub mod pipeline;

pub use builder::{build_browser_query, build_search_cql};
pub use escape::escape_cql_token;
pub use pipeline::{tokenize, Pipeline, QueryState, Step};
