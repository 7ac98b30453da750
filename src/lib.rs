pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::state::AppState;

/// Build the router with every route and the configured global layers.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(proposal_routes())
        .merge(analyst_routes())
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn proposal_routes() -> Router<AppState> {
    use handlers::proposals;

    Router::new()
        .route(
            "/api/proposals",
            get(proposals::list_by_date_range).post(proposals::create),
        )
        .route(
            "/api/proposals/:id",
            get(proposals::get)
                .put(proposals::update)
                .delete(proposals::delete),
        )
}

fn analyst_routes() -> Router<AppState> {
    use handlers::{analysts, login};

    Router::new()
        .route("/api/analysts", post(analysts::create))
        .route("/api/login", post(login::login))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

