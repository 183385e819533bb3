use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single news item as it is persisted and served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    /// ISO-8601 creation timestamp, assigned by the store.
    pub date: String,
    #[serde(default)]
    pub image_url: String,
}

impl Article {
    /// Builds a stored article from client input plus the store-assigned fields.
    pub fn from_new(new: NewArticle, id: String, date: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            content: new.content,
            date: format_date(date),
            image_url: new.image_url.unwrap_or_default(),
        }
    }
}

/// Input for creating an article. `id` and `date` are never taken from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    pub description: String,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial replacement of an article's editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ArticleUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.content.is_none()
            && self.image_url.is_none()
    }

    /// Overwrites the supplied fields; `id` and `date` stay as they are.
    pub fn apply_to(&self, article: &mut Article) {
        if let Some(title) = &self.title {
            article.title = title.clone();
        }
        if let Some(description) = &self.description {
            article.description = description.clone();
        }
        if let Some(content) = &self.content {
            article.content = content.clone();
        }
        if let Some(image_url) = &self.image_url {
            article.image_url = image_url.clone();
        }
    }
}

/// The whole backing document: `{ "articles": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDocument {
    pub articles: Vec<Article>,
}

impl ArticleDocument {
    pub fn find(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}

/// Renders a timestamp the way browsers do for `toISOString()`.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}
