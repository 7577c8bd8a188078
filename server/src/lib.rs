use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tabdex_core::tokenizer::tokenize;
use tabdex_core::{load_index, DocId, IndexStats, InvertedIndex};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize)]
pub struct TermsParams {
    /// Comma-separated exact terms.
    #[serde(default)]
    pub terms: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub terms: Vec<String>,
    pub took_s: f64,
    pub total_hits: usize,
    pub doc_ids: Vec<DocId>,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub num_terms: usize,
}

/// Handler errors, rendered as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    /// The index file exists but is not a valid index (422).
    InvalidIndex(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::InvalidIndex(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Shared server state.
///
/// The served index is never mutated: a reload builds a fresh instance and
/// swaps the `Arc`, so in-flight queries keep the snapshot they started with.
#[derive(Clone)]
pub struct AppState {
    pub index_path: PathBuf,
    pub admin_token: Option<String>,
    index: Arc<RwLock<Arc<InvertedIndex>>>,
}

impl AppState {
    pub fn new(index_path: impl Into<PathBuf>, index: InvertedIndex, admin_token: Option<String>) -> Self {
        Self {
            index_path: index_path.into(),
            admin_token,
            index: Arc::new(RwLock::new(Arc::new(index))),
        }
    }

    pub fn snapshot(&self) -> Arc<InvertedIndex> {
        self.index.read().clone()
    }

    fn replace(&self, index: InvertedIndex) {
        *self.index.write() = Arc::new(index);
    }
}

pub fn build_app(index_path: impl Into<PathBuf>) -> Result<Router> {
    // Load index at startup
    let index_path = index_path.into();
    let index = load_index(&index_path)?;
    tracing::info!(path = %index_path.display(), num_terms = index.len(), "index ready");
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    Ok(router(AppState::new(index_path, index, admin_token)))
}

pub fn router(state: AppState) -> Router {
    // CORS_ALLOW_ORIGIN: comma-separated origins; unset or unparsable allows any
    let origins: Vec<_> = std::env::var("CORS_ALLOW_ORIGIN")
        .map(|val| val.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();
    let allow_origin = if origins.is_empty() { AllowOrigin::any() } else { AllowOrigin::list(origins) };
    let cors = CorsLayer::new().allow_origin(allow_origin).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/query", get(query_handler))
        .route("/stats", get(stats_handler))
        .route("/index/reload", post(reload_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Free-text AND search: `q` is tokenized like the corpus.
pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let terms = tokenize(&params.q);
    Json(respond(&state, params.q, terms))
}

/// Exact-term AND query: `terms=a,b,c`.
pub async fn query_handler(State(state): State<AppState>, Query(params): Query<TermsParams>) -> Json<SearchResponse> {
    let terms: Vec<String> = params
        .terms
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    Json(respond(&state, params.terms, terms))
}

fn respond(state: &AppState, query: String, terms: Vec<String>) -> SearchResponse {
    let start = std::time::Instant::now();
    let doc_ids = state.snapshot().query(terms.as_slice());
    let took_s = start.elapsed().as_secs_f64();
    tracing::debug!(%query, hits = doc_ids.len(), took_s, "query served");
    SearchResponse { query, terms, took_s, total_hits: doc_ids.len(), doc_ids }
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<IndexStats> {
    Json(state.snapshot().stats())
}

/// Re-read the index file and swap it in. The old index keeps serving if
/// the file cannot be loaded.
pub async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<ReloadResponse>, ApiError> {
    authorize(&state, &headers)?;
    let index = load_index(&state.index_path).map_err(|e| {
        tracing::warn!(error = %e, path = %state.index_path.display(), "reload failed");
        if e.is_format() {
            ApiError::InvalidIndex(e.to_string())
        } else {
            ApiError::Internal(e.to_string())
        }
    })?;
    let num_terms = index.len();
    state.replace(index);
    tracing::info!(num_terms, "index reloaded");
    Ok(Json(ReloadResponse { num_terms }))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(required) = state.admin_token.as_deref() else {
        return Err(ApiError::Unauthorized("ADMIN_TOKEN not set".into()));
    };
    match headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()) {
        Some(provided) if provided == required => Ok(()),
        _ => Err(ApiError::Unauthorized("invalid admin token".into())),
    }
}
