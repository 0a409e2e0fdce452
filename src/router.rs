use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde_json::json;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::rate_limit::{RateLimitLayerState, rate_limit_middleware};
use crate::modules::auth::router::init_auth_router;
use crate::modules::course_modules::router::init_course_modules_router;
use crate::modules::groups::router::init_groups_router;
use crate::modules::messages::router::init_messages_router;
use crate::modules::projects::router::init_projects_router;
use crate::modules::submissions::router::init_submissions_router;
use crate::modules::tasks::router::init_tasks_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    let limits = &state.rate_limit_config;
    let auth_limit =
        RateLimitLayerState::new(limits.auth_limiter(), "auth", limits.trust_forwarded_for);
    let general_limit =
        RateLimitLayerState::new(limits.general_limiter(), "general", limits.trust_forwarded_for);
    auth_limit.spawn_cleanup(limits.cleanup_interval);
    general_limit.spawn_cleanup(limits.cleanup_interval);

    let auth_routes = Router::new()
        .nest("/auth", init_auth_router())
        .layer(middleware::from_fn_with_state(auth_limit, rate_limit_middleware));

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .nest("/users", init_users_router(state.clone()))
        .nest("/modules", init_course_modules_router())
        .nest("/projects", init_projects_router())
        .nest("/tasks", init_tasks_router())
        .nest("/groups", init_groups_router())
        .nest("/submissions", init_submissions_router())
        .nest("/messages", init_messages_router())
        .layer(middleware::from_fn_with_state(
            general_limit,
            rate_limit_middleware,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", auth_routes.merge(api_routes))
        .fallback(not_found)
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up")
    ),
    tag = "Health"
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "OK",
        "message": "EduGroupManager API is running"
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}
