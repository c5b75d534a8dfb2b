use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod progression;
pub mod services;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use services::AppState;

pub fn create_router(app_state: std::sync::Arc<services::AppState>) -> Router {
    // CORS for the browser client shell
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any); // TODO: restrict to specific origins in production

    // Chapter listing requires an authenticated, entitled learner.
    let chapter_routes = Router::new()
        .route(
            "/chapters/{chapter_id}/problems",
            get(handlers::problems::list_problems),
        )
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::auth::auth_middleware,
        ));

    // Grading accepts both the authenticated variant (identity from the
    // token) and the unauthenticated one (identity in the body).
    let grade_routes = Router::new()
        .route("/grade", post(handlers::grade::grade_answer))
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::auth::optional_auth_middleware,
        ));

    Router::new()
        // Public endpoints (no auth required)
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler)
                .layer(middleware::from_fn(handlers::metrics_auth_middleware)),
        )
        .nest("/api/v1", chapter_routes.merge(grade_routes).layer(cors))
        .with_state(app_state)
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}
