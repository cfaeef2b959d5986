use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::QuerySpec;
use crate::errors::{ScrapeError, ScrapeResult};

static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("slug pattern is valid"));

/// File-name-safe form of a feed name: ASCII alphanumerics only, lower-cased.
pub fn slugify(name: &str) -> ScrapeResult<String> {
    let slug = NON_ALNUM.replace_all(name, "").to_lowercase();

    if slug.is_empty() {
        return Err(ScrapeError::InvalidFeedName(name.to_string()));
    }

    Ok(slug)
}

/// Feed-level settings the fixers fall back on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedInfo {
    pub url: String,
    pub name: String,
    pub title: String,
    pub description: String,
}

impl FeedInfo {
    /// Title and description default to the feed name.
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            url: url.into(),
            title: name.clone(),
            description: name.clone(),
            name,
        }
    }

    /// Blank overrides keep the default.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            self.title = title;
        }
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
            self.description = description;
        }
        self
    }
}

/// Per-field extraction rules of one feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Queries {
    pub entries: String,
    pub link: QuerySpec,
    #[serde(default)]
    pub title: Option<QuerySpec>,
    #[serde(default)]
    pub content: Option<QuerySpec>,
    #[serde(default)]
    pub date: Option<QuerySpec>,
    #[serde(default)]
    pub image: Option<QuerySpec>,
}

impl Queries {
    pub fn new(entries: impl Into<String>, link: impl Into<QuerySpec>) -> Self {
        Self {
            entries: entries.into(),
            link: link.into(),
            title: None,
            content: None,
            date: None,
            image: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<QuerySpec>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<QuerySpec>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<QuerySpec>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<QuerySpec>) -> Self {
        self.image = Some(image.into());
        self
    }
}
