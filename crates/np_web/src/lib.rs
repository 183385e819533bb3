use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use np_core::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use extract::JsonBody;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route(
            "/api/articles",
            get(handlers::list_articles)
                .post(handlers::create_article)
                .put(handlers::update_article)
                .delete(handlers::delete_article),
        )
        .route("/api/articles/:id", get(handlers::get_article))
        .route("/admin/login", get(auth::login_status).post(auth::login))
        .route("/admin/logout", post(auth::logout))
        .route("/admin/dashboard", get(handlers::dashboard))
        .layer(middleware::from_fn(auth::require_admin))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Serves the app until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("🌐 Listening on http://{}", addr);
    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

pub mod prelude {
    pub use np_core::{Article, Result, Error};
    pub use crate::{create_app, serve, AppState};
}
