//! Wire types for the Confluence content search API.
//!
//! Field names mirror the REST response shape under
//! `expand=content.history.lastUpdated`. Everything below the top level
//! is optional: Confluence omits whole subtrees depending on expansion,
//! content type, and permissions.

use serde::Deserialize;

/// Response envelope for `/wiki/rest/api/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchItem>,
}

/// One search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub content: Content,
    pub title: String,
    pub excerpt: String,
    pub url: Option<String>,
    #[serde(rename = "resultGlobalContainer")]
    pub container: Option<GlobalContainer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    pub id: String,
    pub history: Option<History>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct History {
    #[serde(rename = "lastUpdated")]
    pub last_updated: Option<LastUpdated>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastUpdated {
    pub by: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "profilePicture")]
    pub profile_picture: Option<ProfilePicture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfilePicture {
    pub path: Option<String>,
}

/// The space (or other container) a hit lives in.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalContainer {
    pub title: Option<String>,
    #[serde(rename = "displayUrl")]
    pub display_url: Option<String>,
}

impl SearchItem {
    /// Absolute page URL under the site root.
    pub fn browse_url(&self, base_url: &str) -> String {
        format!("{}/wiki{}", base_url, self.url.as_deref().unwrap_or_default())
    }

    /// Space key pulled out of the container display URL
    /// (`/spaces/<KEY>/...`, matched case-insensitively); empty when the
    /// container or the marker is missing.
    pub fn space_key(&self) -> String {
        let display_url = self
            .container
            .as_ref()
            .and_then(|c| c.display_url.as_deref())
            .unwrap_or_default();
        if display_url.trim().is_empty() {
            return String::new();
        }

        const MARKER: &str = "/spaces/";
        let start = match display_url.to_ascii_lowercase().find(MARKER) {
            Some(i) => i + MARKER.len(),
            None => return String::new(),
        };
        let key = &display_url[start..];
        match key.find('/') {
            Some(end) => key[..end].to_string(),
            None => key.to_string(),
        }
    }

    /// Display name of the person who last touched the page.
    pub fn last_updated_by_name(&self) -> Option<&str> {
        self.last_updated_by()?.display_name.as_deref()
    }

    /// Site-relative avatar path of the last editor.
    pub fn avatar_path(&self) -> Option<&str> {
        self.last_updated_by()?
            .profile_picture
            .as_ref()?
            .path
            .as_deref()
    }

    /// Absolute avatar URL of the last editor, when one was provided.
    pub fn avatar_url(&self, base_url: &str) -> Option<String> {
        let path = self.avatar_path()?;
        if path.trim().is_empty() {
            return None;
        }
        Some(format!("{base_url}{path}"))
    }

    /// Title of the containing space, when known.
    pub fn container_title(&self) -> Option<&str> {
        self.container.as_ref()?.title.as_deref()
    }

    fn last_updated_by(&self) -> Option<&User> {
        self.content
            .history
            .as_ref()?
            .last_updated
            .as_ref()?
            .by
            .as_ref()
    }
}
