use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

mod extract;
mod models;
mod page;
mod pipeline;

use extract::SearchError;
use models::{IndexParams, SearchParams, SearchResponse};

#[derive(Clone)]
struct AppState {
    client: reqwest::Client,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let state = AppState {
        client: reqwest::Client::new(),
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/search", get(search_page))
        .route("/api/search", get(search_api))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn index(Query(params): Query<IndexParams>) -> impl IntoResponse {
    Html(page::index_page(&params.term))
}

async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    match run_search(&state, &params.term).await {
        Ok(result) => Html(page::results_page(&result.term, &result.images)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn search_api(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    match run_search(&state, &params.term).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn run_search(state: &AppState, term: &str) -> Result<SearchResponse, SearchError> {
    let candidates = extract::extract_all(&state.client, term).await?;
    let candidate_count = candidates.len();
    let images = pipeline::build_grid(&state.client, candidates).await;
    tracing::info!(term, candidates = candidate_count, accepted = images.len(), "search complete");
    Ok(SearchResponse {
        term: term.to_string(),
        candidates: candidate_count,
        images,
    })
}

fn error_response(e: SearchError) -> Response {
    let (status, detail) = match &e {
        SearchError::EmptyTerm => (StatusCode::BAD_REQUEST, e.to_string()),
        SearchError::Request(msg) => (
            StatusCode::BAD_GATEWAY,
            format!("Upstream request failed: {}", msg),
        ),
    };
    (status, Json(json!({"detail": detail}))).into_response()
}
