//! In-memory mutations shared by every backend. The caller persists afterwards.

use chrono::Utc;
use np_core::{Article, ArticleDocument, ArticleUpdate, Error, NewArticle, Result};
use crate::unique_id;

/// New articles go to the front so the list reads newest-first.
pub(crate) fn insert_new(doc: &mut ArticleDocument, new: NewArticle) -> Article {
    let id = unique_id(|candidate| doc.contains(candidate));
    let article = Article::from_new(new, id, Utc::now());
    doc.articles.insert(0, article.clone());
    article
}

pub(crate) fn apply_update(doc: &mut ArticleDocument, id: &str, update: &ArticleUpdate) -> Result<Article> {
    let article = doc
        .articles
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    update.apply_to(article);
    Ok(article.clone())
}

/// Returns whether anything was removed.
pub(crate) fn remove(doc: &mut ArticleDocument, id: &str) -> bool {
    let before = doc.articles.len();
    doc.articles.retain(|a| a.id != id);
    doc.articles.len() != before
}
