use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::config::Config;
use crate::handlers;
use crate::AppState;

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let protected_routes = Router::new()
        .route("/api/me", get(handlers::profile::me))
        .route("/api/users/profile", patch(handlers::profile::update_profile))
        // Food diary
        .route(
            "/api/food-logs",
            post(handlers::food_logs::create_food_log).get(handlers::food_logs::list_food_logs),
        )
        .route(
            "/api/food-logs/:id",
            axum::routing::delete(handlers::food_logs::delete_food_log),
        )
        .route(
            "/api/food-logs/:id/restore",
            post(handlers::food_logs::restore_food_log),
        )
        .route("/api/daily-summary", get(handlers::summaries::get_daily_summary))
        .route(
            "/api/daily-summary/nutrients",
            get(handlers::summaries::get_nutrient_breakdown),
        )
        // Goals & energy
        .route("/api/goals", get(handlers::goals::get_goal))
        .route("/api/goals/weight", patch(handlers::goals::set_goal_weight))
        .route("/api/goals/rate", patch(handlers::goals::set_weekly_rate))
        .route("/api/energy-summary", get(handlers::goals::get_energy_summary))
        .route(
            "/api/user-macros",
            get(handlers::goals::get_macros).patch(handlers::goals::update_macros),
        )
        // Body composition
        .route(
            "/api/user-stats",
            post(handlers::body_stats::record_body_metrics)
                .get(handlers::body_stats::list_body_stats),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors_layer(&state.config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
