// Axum API Server Module
//
// Purpose: HTTP boundary for the crop analysis pipeline
// Routes: health, service info, analysis, state/district listings

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AdvisorConfig;
use crate::pipeline::{AnalysisRequest, AnalysisResult, CropAdvisor, PhaseFailure};

const SERVICE_NAME: &str = "Crop Advisor API";

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub advisor: Arc<CropAdvisor>,
    /// Include error debug detail in 500 responses
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(config: &AdvisorConfig) -> Self {
        tracing::info!("Initializing crop advisor...");
        let advisor = CropAdvisor::from_config(config);
        tracing::info!(
            "Crop advisor ready: {} districts, {:?} candidates",
            advisor.registry().len(),
            advisor.candidate_source()
        );
        Self::with_advisor(advisor, config.expose_error_details)
    }

    pub fn with_advisor(advisor: CropAdvisor, expose_error_details: bool) -> Self {
        Self { advisor: Arc::new(advisor), expose_error_details }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        .route("/api/health", get(health_check))

        // Analysis: GET describes the service, POST runs the pipeline
        .route("/api/analyze", get(service_info).post(analyze))

        // Location registry
        .route("/api/states", get(list_states))
        .route("/api/states/:state/districts", get(list_districts))

        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn service_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "online",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "analyze": {
                "method": "POST",
                "path": "/api/analyze",
                "description": "Top three crops by expected profit per acre",
                "requiredFields": ["district", "state", "acres"],
            },
        },
        "stages": {
            "environment": "Weather + soil collection",
            "candidates": state.advisor.candidate_source(),
            "ranking": "Market prices and profitability ranking",
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e.body_text())))?;

    state
        .advisor
        .analyze(&request)
        .await
        .map(Json)
        .map_err(|failure| AppError::Analysis { failure, expose_details: state.expose_error_details })
}

async fn list_states(State(state): State<AppState>) -> Json<Value> {
    let states = state.advisor.registry().list_states();
    Json(json!({ "count": states.len(), "states": states }))
}

async fn list_districts(
    State(state): State<AppState>,
    Path(state_name): Path<String>,
) -> Result<Json<Value>, AppError> {
    let districts = state.advisor.registry().list_regions_in_state(&state_name);
    if districts.is_empty() {
        return Err(AppError::NotFound(format!("State {} not found", state_name)));
    }
    Ok(Json(json!({
        "state": districts[0].state,
        "count": districts.len(),
        "districts": districts,
    })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    /// Pipeline failure: validation → 400, anything else → 500
    Analysis { failure: PhaseFailure, expose_details: bool },
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, details) = match self {
            AppError::Analysis { failure, expose_details } => {
                let details = expose_details.then(|| format!("{:?}", failure));
                if failure.is_validation() {
                    (StatusCode::BAD_REQUEST, failure.source.to_string(), details)
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, failure.to_string(), details)
                }
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
        };

        let mut body = json!({
            "success": false,
            "error": message,
        });
        if let Some(details) = details {
            body["details"] = Value::String(details);
        }

        (status, Json(body)).into_response()
    }
}
