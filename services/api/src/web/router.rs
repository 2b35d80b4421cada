//! services/api/src/web/router.rs
//!
//! Assembles the HTTP router: swap routes, the health check, Swagger UI and
//! the cross-cutting layers (body limit, CORS, request tracing, panic capture).

use crate::web::{
    error::panic_response,
    rest::{
        add_interested_user_handler, create_swap_handler, delete_interest_by_id_handler,
        delete_interested_user_handler, delete_swap_handler, get_swap_handler, health_handler,
        list_swaps_handler, update_interest_by_id_handler, update_interested_user_handler,
        update_swap_handler, ApiDoc,
    },
    state::AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method,
    },
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the complete application router around the shared state.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let config = app_state.config.clone();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);
    let cors = match &config.cors_allow_origin {
        Some(origin) => cors.allow_origin(origin.clone()),
        None => cors.allow_origin(Any),
    };

    let swap_routes = Router::new()
        .route("/api/swaps", get(list_swaps_handler).post(create_swap_handler))
        .route(
            "/api/swaps/{id}",
            get(get_swap_handler)
                .put(update_swap_handler)
                .delete(delete_swap_handler),
        )
        .route("/api/swaps/{id}/interested", post(add_interested_user_handler))
        .route(
            "/api/swaps/{id}/interested/{index}",
            put(update_interested_user_handler).delete(delete_interested_user_handler),
        )
        .route(
            "/api/swaps/{id}/interests/{interest_id}",
            put(update_interest_by_id_handler).delete(delete_interest_by_id_handler),
        );

    // Combine API routes
    let api_router = Router::new()
        .route("/test", get(health_handler))
        .merge(swap_routes)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
