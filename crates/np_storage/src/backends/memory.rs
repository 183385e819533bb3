use async_trait::async_trait;
use np_core::{Article, ArticleDocument, ArticleStore, ArticleUpdate, NewArticle, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use super::document;

/// Articles held only in process memory; lost on exit.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    doc: Arc<RwLock<ArticleDocument>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            doc: Arc::new(RwLock::new(ArticleDocument { articles })),
        }
    }
}

#[async_trait]
impl ArticleStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<Article>> {
        let doc = self.doc.read().await;
        Ok(doc.articles.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Article>> {
        let doc = self.doc.read().await;
        Ok(doc.find(id).cloned())
    }

    async fn create(&self, article: NewArticle) -> Result<Article> {
        let mut doc = self.doc.write().await;
        let created = document::insert_new(&mut doc, article);
        tracing::debug!("Created article {} in memory", created.id);
        Ok(created)
    }

    async fn update(&self, id: &str, update: ArticleUpdate) -> Result<Article> {
        let mut doc = self.doc.write().await;
        document::apply_update(&mut doc, id, &update)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut doc = self.doc.write().await;
        document::remove(&mut doc, id);
        Ok(())
    }
}
