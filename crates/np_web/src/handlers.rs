use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use np_core::{Article, ArticleUpdate, NewArticle};
use serde::Deserialize;
use std::sync::Arc;
use crate::{ApiError, AppState, JsonBody};

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub id: String,
    #[serde(flatten)]
    pub fields: ArticleUpdate,
}

/// A body without `id` deletes nothing.
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub id: String,
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Article>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    match state.store.get_by_id(&id).await? {
        Some(article) => Ok(Json(article)),
        None => Err(np_core::Error::NotFound(id).into()),
    }
}

pub async fn create_article(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<NewArticle>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let article = state.store.create(payload).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn update_article(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<UpdateRequest>,
) -> Result<Json<Article>, ApiError> {
    let article = state.store.update(&payload.id, payload.fields).await?;
    Ok(Json(article))
}

pub async fn delete_article(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<DeleteRequest>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(&payload.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Admin view data: the same list the public API serves.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Article>>, ApiError> {
    list_articles(State(state)).await
}
