use np_core::{AdminCredentials, ArticleStore};
use std::sync::Arc;

pub struct AppState {
    pub store: Arc<dyn ArticleStore>,
    pub credentials: AdminCredentials,
}

impl AppState {
    pub fn new(store: Arc<dyn ArticleStore>, credentials: AdminCredentials) -> Self {
        Self { store, credentials }
    }
}
