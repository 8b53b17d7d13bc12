use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tokio_util::sync::CancellationToken;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use jobscout_core::{TracingSearchReporter, directory};

use crate::auth::require_admin_token;
use crate::dto::{
    DirectoryEntryResponse, HealthResponse, SearchRequest, SearchResponse, SiteListResponse,
    SiteResponse,
};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/v1/search", post(search))
        .route("/v1/sites", get(list_sites))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_token,
        ));

    let public = Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public.merge(api).with_state(state)
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/v1/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Combined listings from every searched site", body = SearchResponse),
        (status = 400, description = "Blank search term", body = crate::dto::ErrorResponse),
        (status = 404, description = "Unknown site name", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "API disabled"),
    ),
    security(("bearer" = [])),
    tag = "search"
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<SearchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let query = body.query.trim();
    if query.is_empty() {
        return Err(ApiError::Validation(
            "search term must not be empty".to_string(),
        ));
    }

    let registry = state.aggregator.registry().select(body.sites.as_slice())?;
    let aggregator = state.aggregator.with_registry(registry);

    // Dropped with this future when the client disconnects.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let report = aggregator
        .search(query, &cancel, &mut TracingSearchReporter)
        .await;

    Ok(axum::Json(SearchResponse::from(report)))
}

// ---------------------------------------------------------------------------
// Sites
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/v1/sites",
    responses(
        (status = 200, description = "Configured sites and the manual-search directory", body = SiteListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "API disabled"),
    ),
    security(("bearer" = [])),
    tag = "sites"
)]
pub async fn list_sites(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = SiteListResponse {
        sites: state
            .aggregator
            .registry()
            .iter()
            .map(SiteResponse::from)
            .collect(),
        directory: directory()
            .iter()
            .map(DirectoryEntryResponse::from)
            .collect(),
    };

    axum::Json(response)
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    axum::Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        sites: state.aggregator.registry().len(),
    })
}
