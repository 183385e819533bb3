use async_trait::async_trait;
use np_core::{Article, ArticleDocument, ArticleStore, ArticleUpdate, NewArticle, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use super::document;

/// Articles persisted as one pretty-printed JSON document.
///
/// Every operation reads the file fresh; mutations rewrite the whole file
/// while holding the write lock, so there is never more than one writer in
/// the process. Writes land in a sibling `.tmp` file that is renamed over the
/// target, which leaves the old content intact if anything fails midway.
pub struct JsonFileStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileStore {
    /// Opens an existing document, failing if it is missing or malformed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            lock: RwLock::new(()),
        };
        store.read_document().await?;
        Ok(store)
    }

    /// Like [`JsonFileStore::open`], but writes an empty document first if the file does not exist.
    pub async fn open_or_init(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !tokio::fs::try_exists(&path).await? {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            write_atomic(&path, &ArticleDocument::default()).await?;
            tracing::info!("📄 Created empty article document at {}", path.display());
        }
        Self::open(path).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<ArticleDocument> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            tracing::error!("Failed to read {}: {}", self.path.display(), e);
            e
        })?;
        let doc = serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Malformed article document {}: {}", self.path.display(), e);
            e
        })?;
        Ok(doc)
    }

    /// Read, mutate and write back as one step under the write lock.
    /// The closure reports whether the document changed; unchanged documents are not rewritten.
    async fn modify<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut ArticleDocument) -> Result<(T, bool)>,
    {
        let _guard = self.lock.write().await;
        let mut doc = self.read_document().await?;
        let (value, changed) = f(&mut doc)?;
        if changed {
            write_atomic(&self.path, &doc).await?;
        }
        Ok(value)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

async fn write_atomic(path: &Path, doc: &ArticleDocument) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(doc)?;
    let tmp = temp_path(path);

    let result = async {
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, path).await
    }
    .await;

    if let Err(e) = result {
        tracing::error!("Failed to write {}: {}", path.display(), e);
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl ArticleStore for JsonFileStore {
    async fn list(&self) -> Result<Vec<Article>> {
        let _guard = self.lock.read().await;
        Ok(self.read_document().await?.articles)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Article>> {
        let _guard = self.lock.read().await;
        let doc = self.read_document().await?;
        Ok(doc.articles.into_iter().find(|a| a.id == id))
    }

    async fn create(&self, article: NewArticle) -> Result<Article> {
        let created = self
            .modify(|doc| Ok((document::insert_new(doc, article), true)))
            .await?;
        tracing::info!("📝 Created article {} ({})", created.id, created.title);
        Ok(created)
    }

    async fn update(&self, id: &str, update: ArticleUpdate) -> Result<Article> {
        let changed = !update.is_empty();
        let updated = self
            .modify(|doc| document::apply_update(doc, id, &update).map(|a| (a, changed)))
            .await?;
        tracing::info!("✏️ Updated article {}", updated.id);
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let removed = self
            .modify(|doc| {
                let removed = document::remove(doc, id);
                Ok((removed, removed))
            })
            .await?;
        if removed {
            tracing::info!("🗑️ Deleted article {}", id);
        } else {
            tracing::debug!("Delete of unknown article {} ignored", id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use np_core::Error;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn new_article(title: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            description: "d".to_string(),
            content: "c".to_string(),
            image_url: None,
        }
    }

    fn stored(id: &str) -> Article {
        Article {
            id: id.to_string(),
            title: format!("Article {}", id),
            description: format!("About {}", id),
            content: "Body".to_string(),
            date: "2024-05-01T12:00:00.000Z".to_string(),
            image_url: String::new(),
        }
    }

    async fn store_with(articles: Vec<Article>) -> (TempDir, JsonFileStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.json");
        let text = serde_json::to_string_pretty(&ArticleDocument { articles }).unwrap();
        std::fs::write(&path, text).unwrap();
        let store = JsonFileStore::open(&path).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_create_on_empty_store() {
        let (_dir, store) = store_with(vec![]).await;

        store.create(new_article("A")).await.unwrap();
        let articles = store.list().await.unwrap();

        assert_eq!(articles.len(), 1);
        let article = &articles[0];
        assert!(!article.id.is_empty());
        assert!(chrono::DateTime::parse_from_rfc3339(&article.date).is_ok());
        assert_eq!(article.image_url, "");
        assert_eq!(article.title, "A");
    }

    #[tokio::test]
    async fn test_round_trip_preserves_sequence() {
        let mut with_image = stored("2");
        with_image.image_url = "https://img.example/2.jpg".to_string();
        let articles = vec![stored("1"), with_image, stored("3")];
        let (_dir, store) = store_with(articles.clone()).await;

        assert_eq!(store.list().await.unwrap(), articles);

        // A rewrite must preserve everything it did not touch.
        store.delete("missing").await.unwrap();
        store.create(new_article("new")).await.unwrap();
        let after = store.list().await.unwrap();
        assert_eq!(&after[1..], &articles[..]);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let (_dir, store) = store_with(vec![]).await;
        let mut ids = HashSet::new();
        for i in 0..25 {
            let article = store.create(new_article(&format!("n{}", i))).await.unwrap();
            assert!(ids.insert(article.id));
        }
        assert_eq!(store.list().await.unwrap().len(), 25);
    }

    #[tokio::test]
    async fn test_concurrent_creates_lose_nothing() {
        let (_dir, store) = store_with(vec![]).await;
        let store = Arc::new(store);

        let tasks = (0..20).map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.create(new_article(&format!("t{}", i))).await })
        });
        for joined in futures::future::join_all(tasks).await {
            joined.unwrap().unwrap();
        }

        let articles = store.list().await.unwrap();
        assert_eq!(articles.len(), 20);
        let ids: HashSet<_> = articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), 20);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_dir, store) = store_with(vec![stored("1"), stored("2")]).await;

        store.delete("1").await.unwrap();
        let once = store.list().await.unwrap();
        store.delete("1").await.unwrap();
        let twice = store.list().await.unwrap();

        assert_eq!(once, vec![stored("2")]);
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_update_preserves_identity() {
        let (_dir, store) = store_with(vec![stored("1"), stored("2")]).await;
        let update = ArticleUpdate {
            title: Some("X".to_string()),
            ..Default::default()
        };

        let updated = store.update("1", update).await.unwrap();

        let mut expected = stored("1");
        expected.title = "X".to_string();
        assert_eq!(updated, expected);
        assert_eq!(store.list().await.unwrap(), vec![expected, stored("2")]);
    }

    #[tokio::test]
    async fn test_update_unknown_id_leaves_store_unchanged() {
        let (_dir, store) = store_with(vec![stored("1")]).await;
        let before = std::fs::read_to_string(store.path()).unwrap();

        let err = store
            .update("nope", ArticleUpdate { title: Some("X".into()), ..Default::default() })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_empty_update_does_not_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.json");
        let compact = serde_json::to_string(&ArticleDocument { articles: vec![stored("1")] }).unwrap();
        std::fs::write(&path, &compact).unwrap();
        let store = JsonFileStore::open(&path).await.unwrap();

        let article = store.update("1", ArticleUpdate::default()).await.unwrap();
        assert_eq!(article, stored("1"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), compact);

        let err = store.update("2", ArticleUpdate::default()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_old_document() {
        let (dir, store) = store_with(vec![stored("1")]).await;
        let before = std::fs::read(store.path()).unwrap();
        std::fs::create_dir(dir.path().join("news.json.tmp")).unwrap();

        let err = store.create(new_article("A")).await.unwrap_err();
        assert!(err.is_io_failure());
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
        assert_eq!(store.list().await.unwrap(), vec![stored("1")]);

        let err = store.delete("1").await.unwrap_err();
        assert!(err.is_io_failure());
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let (_dir, store) = store_with(vec![stored("1")]).await;
        assert_eq!(store.get_by_id("missing").await.unwrap(), None);
        assert_eq!(store.get_by_id("1").await.unwrap(), Some(stored("1")));
    }

    #[tokio::test]
    async fn test_malformed_document_is_io_failure() {
        let (_dir, store) = store_with(vec![stored("1")]).await;
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(store.list().await.unwrap_err().is_io_failure());
        assert!(store.create(new_article("A")).await.unwrap_err().is_io_failure());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("news.json");

        let err = JsonFileStore::open(&path).await.err().unwrap();
        assert!(err.is_io_failure());

        let store = JsonFileStore::open_or_init(&path).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, serde_json::json!({ "articles": [] }));

        std::fs::remove_file(&path).unwrap();
        assert!(store.list().await.unwrap_err().is_io_failure());
    }

    #[tokio::test]
    async fn test_writes_leave_no_temp_file() {
        let (dir, store) = store_with(vec![]).await;
        store.create(new_article("A")).await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["news.json".to_string()]);

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\n  \"articles\""));
        assert!(text.contains("\"imageUrl\""));
    }
}
