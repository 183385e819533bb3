use np_core::{ArticleStore, Error, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

pub mod backends;

pub use backends::*;

/// Which backend holds the articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Json,
    Memory,
}

impl Default for StoreKind {
    fn default() -> Self {
        Self::Json
    }
}

impl FromStr for StoreKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" | "file" => Ok(Self::Json),
            "memory" => Ok(Self::Memory),
            other => Err(Error::Config(format!("Unknown storage backend: {}", other))),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Builds the one store instance a process shares between all entry points.
pub async fn create_store(kind: StoreKind, path: &Path) -> Result<Arc<dyn ArticleStore>> {
    let store: Arc<dyn ArticleStore> = match kind {
        StoreKind::Json => Arc::new(JsonFileStore::open_or_init(path).await?),
        StoreKind::Memory => Arc::new(InMemoryStore::new()),
    };
    tracing::info!("🏦 Article store ready (using {})", kind);
    Ok(store)
}

/// Random 128-bit identifier rendered as 32 lowercase hex chars.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Generates an id that no existing article already uses.
pub(crate) fn unique_id<F>(taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    loop {
        let id = generate_id();
        if !taken(&id) {
            return id;
        }
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_store, StoreKind};
    pub use np_core::{Article, ArticleStore, ArticleUpdate, NewArticle, Result, Error};
}
