use axum::{Json, extract::State};

use crate::incoming::http_axum::dto::responses::{ApiResponse, HealthResponse};
use crate::shared::app_state::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success_with_data(Some(HealthResponse {
        status: "ok".to_string(),
        environment: state.config.environment.env.clone(),
        sweep_enabled: state.config.sweep.enabled,
    })))
}
