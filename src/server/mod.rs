//! Read-only JSON API over the posts directory

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::Folio;

/// Server state
struct ServerState {
    folio: Folio,
}

/// Build the API router
pub fn router(folio: Folio) -> Router {
    let state = Arc::new(ServerState { folio });

    Router::new()
        .route("/api/posts", get(list_handler))
        .route("/api/posts/:slug", get(post_handler))
        .route("/api/posts/:slug/html", get(html_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let app = router(folio.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Serving posts from {:?}", folio.posts_dir);
    println!("Server running at http://{}:{}/api/posts", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn list_handler(State(state): State<Arc<ServerState>>) -> Response {
    match state.folio.summaries().await {
        Ok(summaries) => Json(summaries).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    match state.folio.repository().get_post(&slug).await {
        Ok(Some(post)) => Json(post).into_response(),
        Ok(None) => not_found(),
        Err(e) => internal_error(e.into()),
    }
}

async fn html_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let post = match state.folio.repository().get_post(&slug).await {
        Ok(Some(post)) => post,
        Ok(None) => return not_found(),
        Err(e) => return internal_error(e.into()),
    };

    match state.folio.render_post(&post) {
        Ok(html) => Html(html).into_response(),
        Err(e) => internal_error(e),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

fn internal_error(e: anyhow::Error) -> Response {
    tracing::error!("Request failed: {:#}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)).into_response()
}
