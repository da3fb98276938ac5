//! Result rows handed to frontends.
//!
//! The library renders nothing and opens nothing. A row carries display
//! text plus the URLs and clipboard text a frontend needs to act on it;
//! a launcher turns rows into list entries, the CLI prints them as a
//! table.

use crate::models::SearchItem;
use crate::settings::Settings;

/// What a row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// A content hit from the search API.
    Page,
    /// Static syntax help, shown for an empty query.
    Hint,
    /// Tail action that reruns the search in the Confluence web UI.
    OpenInBrowser,
}

/// One displayable result row.
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub kind: RowKind,
    pub title: String,
    pub subtitle: String,
    /// Avatar of the last editor, when the API provided one. Frontends
    /// fall back to their own icon.
    pub icon_url: Option<String>,
    /// URL to open when the row is activated.
    pub url: Option<String>,
    /// Content id, for page rows.
    pub content_id: Option<String>,
    /// What a copy action should put on the clipboard.
    pub copy_text: Option<String>,
}

/// Row for one search hit. Carries the CQL that produced it as copy
/// text, so a hit can be turned back into a saved filter.
pub fn page_row(item: &SearchItem, settings: &Settings, cql: &str) -> ResultRow {
    let excerpt = flatten_excerpt(&item.excerpt);
    let editor = item.last_updated_by_name().unwrap_or_default();
    let container = item.container_title().unwrap_or_default();
    let subtitle = format!("{editor} · {container} | {excerpt}");

    ResultRow {
        kind: RowKind::Page,
        title: decode_html_entities(&item.title),
        subtitle: decode_html_entities(&subtitle),
        icon_url: item.avatar_url(&settings.base_url),
        url: Some(item.browse_url(&settings.base_url)),
        content_id: Some(item.content.id.clone()),
        copy_text: Some(cql.to_string()),
    }
}

/// Syntax help shown when the query is empty.
pub fn hint_rows() -> Vec<ResultRow> {
    vec![
        hint(
            "@me @name",
            "Search pages by contributor: me (@me) or specific person (@name)",
        ),
        hint("/ \" . ", "Search for folders (/), blogs (\") or pages(.)"),
        hint("*", "Search for all types (otherwise defaults to pages & blogs)"),
        hint("+Label1", "Pages with label 'Label1'"),
    ]
}

/// Tail row that reruns the search in the web UI. The browser query is
/// appended to the search page URL as-is; the web UI reads it back in
/// the same shape it was produced.
pub fn open_in_browser_row(
    title: &str,
    original_query: &str,
    browser_query: &str,
    settings: &Settings,
) -> ResultRow {
    let url = format!("{}/wiki/search?{}", settings.base_url, browser_query);
    ResultRow {
        kind: RowKind::OpenInBrowser,
        title: title.to_string(),
        subtitle: original_query.to_string(),
        icon_url: None,
        url: Some(url.clone()),
        content_id: None,
        copy_text: Some(url),
    }
}

fn hint(title: &str, subtitle: &str) -> ResultRow {
    ResultRow {
        kind: RowKind::Hint,
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        icon_url: None,
        url: None,
        content_id: None,
        copy_text: None,
    }
}

/// Collapse an excerpt onto one line, replacing line breaks with a
/// middle-dot separator.
fn flatten_excerpt(excerpt: &str) -> String {
    excerpt
        .replace("\r\n", " · ")
        .replace('\n', " · ")
        .replace('\r', " · ")
}

/// Decode the handful of HTML entities Confluence puts into titles and
/// excerpts. `&amp;` goes last so a literal `&amp;lt;` decodes once, to
/// `&lt;`, not twice.
fn decode_html_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchResponse;

    fn sample_item() -> SearchItem {
        let response: SearchResponse = serde_json::from_str(
            r#"{
                "results": [{
                    "content": {
                        "id": "123456",
                        "history": {
                            "lastUpdated": {
                                "by": {
                                    "displayName": "Ada Wright",
                                    "profilePicture": { "path": "/wiki/aa-avatar/712020:abc" }
                                }
                            }
                        }
                    },
                    "title": "Release &amp; rollout checklist",
                    "excerpt": "Steps for the next release.\nOwned by the platform team.",
                    "url": "/spaces/DEV/pages/123456/Release",
                    "resultGlobalContainer": { "title": "Development", "displayUrl": "/spaces/DEV" }
                }]
            }"#,
        )
        .unwrap();
        response.results.into_iter().next().unwrap()
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.base_url = "https://wiki.example.org".to_string();
        settings
    }

    #[test]
    fn page_row_shapes_title_and_subtitle() {
        let row = page_row(&sample_item(), &settings(), "type IN(page)");
        assert_eq!(row.kind, RowKind::Page);
        assert_eq!(row.title, "Release & rollout checklist");
        assert_eq!(
            row.subtitle,
            "Ada Wright · Development | Steps for the next release. · Owned by the platform team."
        );
        assert_eq!(
            row.url.as_deref(),
            Some("https://wiki.example.org/wiki/spaces/DEV/pages/123456/Release")
        );
        assert_eq!(
            row.icon_url.as_deref(),
            Some("https://wiki.example.org/wiki/aa-avatar/712020:abc")
        );
        assert_eq!(row.content_id.as_deref(), Some("123456"));
        assert_eq!(row.copy_text.as_deref(), Some("type IN(page)"));
    }

    #[test]
    fn page_row_tolerates_missing_editor_and_container() {
        let mut item = sample_item();
        item.content.history = None;
        item.container = None;
        let row = page_row(&item, &settings(), "cql");
        assert_eq!(
            row.subtitle,
            " ·  | Steps for the next release. · Owned by the platform team."
        );
        assert_eq!(row.icon_url, None);
    }

    #[test]
    fn hint_rows_cover_the_sigils() {
        let rows = hint_rows();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.kind == RowKind::Hint));
        assert!(rows.iter().all(|r| r.url.is_none()));
        assert_eq!(rows[0].title, "@me @name");
    }

    #[test]
    fn open_in_browser_row_carries_the_search_page_url() {
        let row = open_in_browser_row(
            "More results in browser ...",
            "test +label1",
            "spaces=AAA,BBB&labels=label1&text=test",
            &settings(),
        );
        assert_eq!(row.kind, RowKind::OpenInBrowser);
        assert_eq!(row.subtitle, "test +label1");
        assert_eq!(
            row.url.as_deref(),
            Some("https://wiki.example.org/wiki/search?spaces=AAA,BBB&labels=label1&text=test")
        );
        assert_eq!(row.copy_text, row.url);
    }

    #[test]
    fn entity_decoding_is_single_pass() {
        assert_eq!(decode_html_entities("&amp;lt;tag&amp;gt;"), "&lt;tag&gt;");
        assert_eq!(decode_html_entities("a &lt; b &amp; c &gt; d"), "a < b & c > d");
        assert_eq!(decode_html_entities("&quot;hi&quot; &nbsp;&#39;"), "\"hi\"  '");
    }

    #[test]
    fn excerpts_flatten_every_line_break_style() {
        assert_eq!(flatten_excerpt("a\r\nb\nc\rd"), "a · b · c · d");
    }
}
