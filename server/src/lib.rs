use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sift_core::{
    load_documents, search_scored, DocumentCollection, IndexBuilder, IndexConfig, QueryTermMode, SearchConfig,
    TermWeightIndex,
};
use std::path::PathBuf;
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default)]
    pub terms: QueryTermMode,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f64,
    pub text: String,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub num_docs: usize,
    pub num_terms: usize,
    pub built_at: String,
    pub config: IndexConfig,
}

impl StatsResponse {
    fn new(snapshot: &Snapshot, config: IndexConfig) -> Self {
        Self {
            num_docs: snapshot.docs.len(),
            num_terms: snapshot.index.num_terms(),
            built_at: snapshot.built_at.clone(),
            config,
        }
    }
}

/// One immutable corpus build: the documents, their index and when it was made.
pub struct Snapshot {
    pub docs: DocumentCollection<String>,
    pub index: TermWeightIndex<String>,
    pub built_at: String,
}

impl Snapshot {
    pub fn build(docs: DocumentCollection<String>, config: IndexConfig) -> Result<Self> {
        let index = IndexBuilder::new(config).build(&docs)?;
        let built_at = time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| "".into());
        Ok(Self { docs, index, built_at })
    }

    pub fn load(source: &std::path::Path, config: IndexConfig) -> Result<Self> {
        Self::build(load_documents(source)?, config)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub source: PathBuf,
    pub config: IndexConfig,
    pub snapshot: Arc<RwLock<Arc<Snapshot>>>,
    pub admin_token: Option<String>,
}

impl AppState {
    /// The snapshot current at the time of the call; the lock is released on return.
    pub fn current(&self) -> Arc<Snapshot> { self.snapshot.read().clone() }

    /// Build a fresh snapshot from the source path and swap it in.
    /// On failure the previous snapshot keeps serving.
    pub fn rebuild(&self) -> Result<Arc<Snapshot>> {
        let next = Arc::new(Snapshot::load(&self.source, self.config)?);
        *self.snapshot.write() = next.clone();
        tracing::info!(num_docs = next.docs.len(), num_terms = next.index.num_terms(), "swapped in rebuilt snapshot");
        Ok(next)
    }
}

pub fn build_app(source: impl Into<PathBuf>, config: IndexConfig) -> Result<Router> {
    // Build the first snapshot at startup
    let source = source.into();
    let snapshot = Snapshot::load(&source, config)?;
    tracing::info!(num_docs = snapshot.docs.len(), num_terms = snapshot.index.num_terms(), "index ready");
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let app_state = AppState { source, config, snapshot: Arc::new(RwLock::new(Arc::new(snapshot))), admin_token };
    Ok(router(app_state))
}

pub fn router(app_state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/stats", get(stats_handler))
        .route("/index/rebuild", post(rebuild_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let snapshot = state.current();
    let config = SearchConfig { query_terms: params.terms };
    let ranked = search_scored(&params.q, &snapshot.docs, &snapshot.index, &config);

    let total_hits = ranked.len();
    let k = params.k.clamp(1, 100);
    let results = ranked
        .into_iter()
        .take(k)
        .filter_map(|(id, score)| {
            let text = snapshot.docs.get(&id)?.text.clone();
            Some(SearchHit { id, score, text })
        })
        .collect();

    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results })
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let snapshot = state.current();
    match snapshot.docs.get(&doc_id) {
        Some(doc) => Ok(Json(serde_json::json!({ "id": doc.id, "text": doc.text }))),
        None => Err((StatusCode::NOT_FOUND, format!("document {doc_id} not found"))),
    }
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let snapshot = state.current();
    Json(StatsResponse::new(&snapshot, state.config))
}

async fn rebuild_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<StatsResponse>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    // Loading and indexing are blocking work
    let worker = state.clone();
    let rebuilt = tokio::task::spawn_blocking(move || worker.rebuild())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    match rebuilt {
        Ok(snapshot) => Ok(Json(StatsResponse::new(&snapshot, state.config))),
        Err(e) => {
            tracing::warn!(error = %e, "rebuild failed; keeping previous snapshot");
            Err((StatusCode::UNPROCESSABLE_ENTITY, format!("{e:#}")))
        }
    }
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
