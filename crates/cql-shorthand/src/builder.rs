//! The two concrete pipelines: CQL filter and browser query string.
//!
//! Both read the same sigil shorthand and share one rule order. The rule
//! order is load-bearing twice over: earlier rules steal tokens from later
//! ones, and aggregated clauses list values in rule order rather than in
//! the order the user typed them.

use lazy_static::lazy_static;
use regex::Regex;

use crate::escape::escape_cql_token;
use crate::pipeline::{Pipeline, Step};

lazy_static! {
    /// `#all` lifts the default space restriction.
    static ref SPACE_ALL: Regex = token_rule("#all");
    /// `#key` restricts to one space; repeatable.
    static ref SPACE_NAME: Regex = token_rule("#([a-zA-Z]{2,})");
    /// `*` lifts the default content-type restriction.
    static ref TYPE_ALL: Regex = token_rule(r"\*");
    /// `/` asks for folders.
    static ref TYPE_FOLDER: Regex = token_rule("/");
    /// `"` asks for blog posts.
    static ref TYPE_BLOGPOST: Regex = token_rule("\"");
    /// Any single leftover character asks for pages; `.` by convention.
    static ref TYPE_PAGE: Regex = token_rule(".");
    /// `+label` restricts to one label; repeatable.
    static ref LABEL: Regex = token_rule(r"\+([a-zA-Z0-9]{2,})");
    /// `@me` restricts to the signed-in user as contributor.
    static ref CONTRIBUTOR_ME: Regex = token_rule("@me");
    /// `@name` restricts to a contributor by full-name match.
    static ref CONTRIBUTOR_NAME: Regex = token_rule(r"@([\p{L}-]{2,})");
    /// Whatever survives the rules above is free search text.
    static ref FREE_TEXT: Regex = token_rule(".*");
}

/// Compile a rule pattern, anchored to span a whole token.
fn token_rule(pattern: &str) -> Regex {
    Regex::new(&format!("^{pattern}$")).unwrap()
}

fn space_clause(memory: &[String]) -> String {
    format!("space IN ({})", memory.join(","))
}

fn type_clause(memory: &[String]) -> String {
    format!("type IN({})", memory.join(","))
}

fn label_clause(memory: &[String]) -> String {
    format!("label IN ({})", memory.join(","))
}

fn contributor_clause(name: &str) -> Vec<String> {
    vec![format!("contributor.fullname ~ {name}")]
}

fn contributor_group(memory: &[String]) -> String {
    format!("({})", memory.join(" OR "))
}

/// Free-text clause matching title and body. Tokens that escape to
/// nothing are dropped; the clause is emitted even when none survive.
fn search_text_clause(memory: &[String]) -> String {
    let escaped: Vec<String> = memory
        .iter()
        .map(|token| escape_cql_token(token))
        .filter(|token| !token.is_empty())
        .collect();
    let text = escaped.join(" ");
    format!("(title~\"{text}\" OR text~\"{text}\")")
}

fn browser_space_pairs(memory: &[String]) -> String {
    format!("space={}", memory.join(","))
}

fn browser_label_pairs(memory: &[String]) -> String {
    format!("labels={}", memory.join(","))
}

fn browser_text_pair(memory: &[String]) -> String {
    format!("text={}", memory.join(" "))
}

/// Compile query text into a CQL filter for the content search API.
///
/// `default_spaces` is the space restriction applied when the text has no
/// `#` sigil; pass an empty slice to search everywhere. Results are always
/// ordered newest-modified first.
///
/// # Examples
/// ```
/// use cql_shorthand::build_search_cql;
/// assert_eq!(
///     build_search_cql("roadmap #docs", &[]),
///     "space IN (docs) AND type IN(page,blogpost) AND (title~\"roadmap*\" OR text~\"roadmap*\") order by lastmodified DESC"
/// );
/// ```
pub fn build_search_cql(text: &str, default_spaces: &[String]) -> String {
    let space_default = if default_spaces.is_empty() {
        String::new()
    } else {
        space_clause(default_spaces)
    };

    Pipeline::new(
        vec![
            Step::Match(&SPACE_ALL),
            Step::Discard,
            Step::Match(&SPACE_NAME),
            Step::RememberAll,
            Step::Aggregate(space_clause),
            Step::OrDefault(space_default),
            Step::Match(&TYPE_ALL),
            Step::Discard,
            Step::Match(&TYPE_FOLDER),
            Step::RememberConst("folder"),
            Step::Match(&TYPE_BLOGPOST),
            Step::RememberConst("blogpost"),
            Step::Match(&TYPE_PAGE),
            Step::RememberConst("page"),
            Step::Aggregate(type_clause),
            Step::OrDefault("type IN(page,blogpost)".to_string()),
            Step::Match(&LABEL),
            Step::RememberAll,
            Step::Aggregate(label_clause),
            Step::Match(&CONTRIBUTOR_ME),
            Step::RememberConst("contributor = currentUser()"),
            Step::Match(&CONTRIBUTOR_NAME),
            Step::RememberMap(contributor_clause),
            Step::Aggregate(contributor_group),
            Step::Match(&FREE_TEXT),
            Step::RememberAll,
            Step::Aggregate(search_text_clause),
        ],
        " AND ",
        " order by lastmodified DESC",
    )
    .run(text)
}

/// Compile query text into the query string of the Confluence web UI
/// search page, for reproducing the same search in a browser.
///
/// Free text is carried verbatim; the web UI does its own interpretation.
///
/// # Examples
/// ```
/// use cql_shorthand::build_browser_query;
/// assert_eq!(build_browser_query("roadmap #docs", &[]), "space=docs&text=roadmap");
/// ```
pub fn build_browser_query(text: &str, default_spaces: &[String]) -> String {
    let space_default = if default_spaces.is_empty() {
        String::new()
    } else {
        format!("spaces={}", default_spaces.join(","))
    };

    Pipeline::new(
        vec![
            Step::Match(&SPACE_ALL),
            Step::Discard,
            Step::Match(&SPACE_NAME),
            Step::RememberAll,
            Step::Aggregate(browser_space_pairs),
            Step::OrDefault(space_default),
            Step::Match(&TYPE_ALL),
            Step::Discard,
            Step::Match(&TYPE_FOLDER),
            Step::Emit("type=folder"),
            Step::Match(&TYPE_BLOGPOST),
            Step::Emit("type=blogpost"),
            Step::Match(&TYPE_PAGE),
            Step::Emit("type=page"),
            Step::Match(&LABEL),
            Step::RememberAll,
            Step::Aggregate(browser_label_pairs),
            Step::Match(&CONTRIBUTOR_ME),
            Step::Discard,
            Step::Match(&CONTRIBUTOR_NAME),
            Step::Discard,
            Step::Match(&FREE_TEXT),
            Step::RememberAll,
            Step::Aggregate(browser_text_pair),
        ],
        "&",
        "",
    )
    .run(text)
}
