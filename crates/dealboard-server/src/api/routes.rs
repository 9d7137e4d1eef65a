use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{businesses, comments, deals, enriched, health};
use crate::AppState;

async fn fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": {
                "code": "not_found",
                "message": "The requested endpoint does not exist"
            }
        })),
    )
}

pub fn build(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/businesses", get(businesses::list))
        .route("/businesses", post(businesses::create))
        .route("/businesses/:id", get(businesses::get))
        .route("/businesses/:id", put(businesses::update))
        .route("/businesses/:id", delete(businesses::delete))
        .route("/businesses/:id/vote", post(businesses::vote))
        .route("/deals", get(deals::list))
        .route("/deals", post(deals::create))
        .route("/deals/:id", get(deals::get))
        .route("/deals/:id", put(deals::update))
        .route("/deals/:id", delete(deals::delete))
        .route("/deals/:id/vote", post(deals::vote))
        .route("/comments", get(comments::list))
        .route("/comments", post(comments::create))
        .route("/comments/:id", get(comments::get))
        .route("/comments/:id", put(comments::update))
        .route("/comments/:id", delete(comments::delete))
        .route("/comments/:id/vote", post(comments::vote))
        .route("/api/deals-enriched", get(enriched::list))
        .fallback(fallback);

    api.with_state(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(30)))
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive()),
    )
}
