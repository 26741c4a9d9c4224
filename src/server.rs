use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::models::{CalorieRequest, CalorieResponse, ErrorResponse};
use crate::services::CalorieEstimator;

const ESTIMATION_FAILED: &str = "Failed to calculate calories";

pub struct AppState {
    pub estimator: Arc<CalorieEstimator>,
}

pub fn create_router(estimator: Arc<CalorieEstimator>) -> Router {
    let state = Arc::new(AppState { estimator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/api/calculate-calories", post(calculate_calories_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(state)
}

fn estimation_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: ESTIMATION_FAILED.to_string(),
        }),
    )
        .into_response()
}

/// Any failure, including an unreadable or malformed body, answers 500 with a fixed message.
async fn calculate_calories_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(b) => b,
        Err(e) => {
            log::error!("❌ Failed to read calorie request body: {}", e);
            return estimation_failed();
        }
    };

    let request: CalorieRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            log::error!("❌ Failed to parse calorie request: {}", e);
            log::debug!(
                "📦 Raw body: {}",
                String::from_utf8_lossy(&body[..body.len().min(500)])
            );
            return estimation_failed();
        }
    };

    let exercise = request.exercise.trim();
    if exercise.is_empty() || request.duration == 0 {
        log::error!(
            "❌ Rejected calorie request: exercise={:?}, duration={}",
            request.exercise,
            request.duration
        );
        return estimation_failed();
    }

    log::info!(
        "🏃 Calorie request: {} for {} min at {} intensity",
        exercise,
        request.duration,
        request.intensity
    );

    match state
        .estimator
        .estimate(exercise, request.duration, request.intensity)
        .await
    {
        Ok(calories) => (StatusCode::OK, Json(CalorieResponse { calories })).into_response(),
        Err(e) => {
            log::error!("❌ Calorie estimation error: {}", e);
            estimation_failed()
        }
    }
}

async fn root_handler() -> &'static str {
    "Workout Calorie Tracker - POST /api/calculate-calories with {exercise, duration, intensity}"
}

async fn health_check() -> &'static str {
    "OK"
}
