use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::{AppState, handlers};

async fn health_check() -> &'static str {
    "ok"
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/projects/get_projects", get(handlers::get_projects))
        .route("/projects/get_project/{project_id}", get(handlers::get_project))
        .route("/projects/create_project", post(handlers::create_project))
        .route("/projects/update_project", put(handlers::update_project))
        .route("/projects/delete_project", delete(handlers::delete_project))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
