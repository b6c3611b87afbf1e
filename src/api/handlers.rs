//! API Handlers
//!
//! HTTP request handlers for each browser endpoint. Handlers only read and
//! drive the state manager; they never call fetchers directly.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::context::AppContext;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    ChildQuery, HealthResponse, InvalidateResponse, RefreshQuery, ResourceKind, ResourcesResponse,
    Scope, StatsResponse,
};
use crate::state::PreloadSummary;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub ctx: AppContext,
}

impl AppState {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }
}

fn parse_kind(raw: &str) -> ApiResult<ResourceKind> {
    raw.parse()
        .map_err(|_| ApiError::UnknownKind(raw.to_string()))
}

/// Handler for GET /projects
pub async fn projects_handler(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
) -> ApiResult<Json<ResourcesResponse>> {
    let items = state.ctx.state.load_projects(query.refresh).await?;
    Ok(Json(ResourcesResponse::new(
        ResourceKind::Project,
        &Scope::Global,
        items,
    )))
}

/// Handler for GET /projects/:project/:kind
///
/// Lists a project-level kind, loading it on first access.
pub async fn resources_handler(
    State(state): State<AppState>,
    Path((project_id, kind)): Path<(String, String)>,
    Query(query): Query<RefreshQuery>,
) -> ApiResult<Json<ResourcesResponse>> {
    let kind = parse_kind(&kind)?;
    let scope = Scope::project(project_id);
    let items = state.ctx.state.load(kind, &scope, query.refresh).await?;

    Ok(Json(ResourcesResponse::new(kind, &scope, items)))
}

/// Handler for GET /projects/:project/:kind/:parent
///
/// Lists a child kind (DNS records, nodes, instances, role bindings) under
/// one parent resource.
pub async fn children_handler(
    State(state): State<AppState>,
    Path((project_id, kind, parent)): Path<(String, String, String)>,
    Query(query): Query<ChildQuery>,
) -> ApiResult<Json<ResourcesResponse>> {
    let kind = parse_kind(&kind)?;
    let scope = match query.location() {
        Some(location) => Scope::child_in(project_id, parent, location),
        None => Scope::child(project_id, parent),
    };
    let items = state.ctx.state.load(kind, &scope, query.refresh).await?;

    Ok(Json(ResourcesResponse::new(kind, &scope, items)))
}

/// Handler for DELETE /projects/:project
pub async fn invalidate_project_handler(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Json<InvalidateResponse> {
    state.ctx.state.invalidate_project(&project_id).await;
    let remaining = state.ctx.state.loaded_count().await;

    Json(InvalidateResponse::project(&project_id, remaining))
}

/// Handler for DELETE /state
pub async fn invalidate_all_handler(State(state): State<AppState>) -> Json<InvalidateResponse> {
    state.ctx.state.invalidate_all().await;
    Json(InvalidateResponse::all())
}

/// Handler for POST /preload
///
/// Loads the project list, then every project-level kind for each project.
pub async fn preload_handler(State(state): State<AppState>) -> ApiResult<Json<PreloadSummary>> {
    let projects = state.ctx.state.load_projects(false).await?;
    let mut report = |done: usize, total: usize, message: &str| {
        info!("Preload {}/{}: {}", done, total, message);
    };
    let summary = state
        .ctx
        .state
        .load_all_resources(&projects, Some(&mut report))
        .await;

    Ok(Json(summary))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = &state.ctx.cache;

    Json(StatsResponse::new(
        cache.get_stats().await,
        cache.size().await,
        cache.size_bytes().await,
        cache.max_size_bytes().await,
        state.ctx.state.loaded_count().await,
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
