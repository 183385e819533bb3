use async_trait::async_trait;
use crate::article::{Article, ArticleUpdate, NewArticle};
use crate::Result;

/// Sole owner of article data. Every entry point goes through one instance.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Get every article in display order
    async fn list(&self) -> Result<Vec<Article>>;

    /// Look up a single article; `None` when no article has this id
    async fn get_by_id(&self, id: &str) -> Result<Option<Article>>;

    /// Store a new article with a fresh id and the current date
    async fn create(&self, article: NewArticle) -> Result<Article>;

    /// Merge the supplied fields into an existing article
    async fn update(&self, id: &str, update: ArticleUpdate) -> Result<Article>;

    /// Remove an article; unknown ids are ignored
    async fn delete(&self, id: &str) -> Result<()>;
}
