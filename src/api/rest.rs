//! Axum REST API handlers

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post, delete},
    extract::{Path, State, DefaultBodyLimit},
    http::{header, HeaderMap, StatusCode},
    response::Json,
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::AnalysisError;
use crate::provider::DetectTransport;
use crate::service::{AnalysisResult, AnalysisService, JournalStats};
use crate::storage::{ScanRecord, ScanStorage};

use super::auth::TokenVerifier;
use super::dto::*;

/// Application state shared across handlers
pub struct AppState<S: ScanStorage, T: DetectTransport> {
    pub service: Arc<AnalysisService<S, T>>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub start_time: Instant,
}

/// Create the REST API router
pub fn create_rest_router<S: ScanStorage, T: DetectTransport + 'static>(
    state: Arc<AppState<S, T>>,
) -> Router {
    Router::new()
        // Scan operations
        .route("/api/rpc/scans.analyze", post(analyze_handler::<S, T>))
        .route("/api/rpc/scans.save", post(save_handler::<S, T>))
        .route("/api/rpc/scans.getHistory", get(history_handler::<S, T>))
        .route("/api/rpc/scans.stats", get(stats_handler::<S, T>))
        .route("/api/rpc/scans.delete/:scan_id", delete(delete_handler::<S, T>))
        .route("/api/rpc/scans.deleteAll", delete(delete_all_handler::<S, T>))
        // System endpoints
        .route("/api", get(status_handler::<S, T>))
        .route("/api/health", get(health_handler::<S, T>))
        // Middleware
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024)) // 50MB limit for large images
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolve the bearer token on a request to a user id
fn authorize<S: ScanStorage, T: DetectTransport>(
    state: &AppState<S, T>,
    headers: &HeaderMap,
) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new("Missing bearer token", "UNAUTHORIZED")))
        })?;

    state.verifier.verify(token).ok_or_else(|| {
        (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new("Invalid or expired token", "UNAUTHORIZED")))
    })
}

/// Map an analysis error to its HTTP status
fn error_status(err: &AnalysisError) -> StatusCode {
    match err {
        AnalysisError::CredentialsMissing => StatusCode::INTERNAL_SERVER_ERROR,
        AnalysisError::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        AnalysisError::UnexpectedResponse => StatusCode::BAD_GATEWAY,
        AnalysisError::AuthenticationFailed => StatusCode::BAD_GATEWAY,
        AnalysisError::ProviderTimeout => StatusCode::GATEWAY_TIMEOUT,
        AnalysisError::NoFaceDetected => StatusCode::UNPROCESSABLE_ENTITY,
        AnalysisError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        AnalysisError::Provider(_) => StatusCode::BAD_GATEWAY,
        AnalysisError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_reply(err: AnalysisError) -> (StatusCode, Json<ErrorResponse>) {
    (error_status(&err), Json(ErrorResponse::new(&err.to_string(), err.code())))
}

/// Analyze a skin photo
async fn analyze_handler<S: ScanStorage, T: DetectTransport>(
    State(state): State<Arc<AppState<S, T>>>,
    headers: HeaderMap,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, (StatusCode, Json<ErrorResponse>)> {
    let _user_id = authorize(&state, &headers)?;

    let result = state.service.analyze(&request.image_base64).await.map_err(|e| {
        error!("Analysis failed: {}", e);
        error_reply(e)
    })?;

    Ok(Json(result))
}

/// Save a finished analysis to the caller's journal
async fn save_handler<S: ScanStorage, T: DetectTransport>(
    State(state): State<Arc<AppState<S, T>>>,
    headers: HeaderMap,
    Json(request): Json<SaveScanRequest>,
) -> Result<Json<ScanRecord>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = authorize(&state, &headers)?;

    let record = state
        .service
        .save_scan(&user_id, &request.result, &request.image_uri)
        .await
        .map_err(|e| {
            error!("Failed to save scan: {}", e);
            error_reply(e)
        })?;

    Ok(Json(record))
}

/// Scan history for the authenticated user, newest first
async fn history_handler<S: ScanStorage, T: DetectTransport>(
    State(state): State<Arc<AppState<S, T>>>,
    headers: HeaderMap,
) -> Result<Json<HistoryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = authorize(&state, &headers)?;

    let scans = state.service.history(&user_id).await.map_err(|e| {
        error!("Failed to load history: {}", e);
        error_reply(e)
    })?;

    Ok(Json(HistoryResponse { scans }))
}

/// Journal summary for the authenticated user
async fn stats_handler<S: ScanStorage, T: DetectTransport>(
    State(state): State<Arc<AppState<S, T>>>,
    headers: HeaderMap,
) -> Result<Json<JournalStats>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = authorize(&state, &headers)?;

    let stats = state.service.stats(&user_id).await.map_err(|e| {
        error!("Failed to compute stats: {}", e);
        error_reply(e)
    })?;

    Ok(Json(stats))
}

/// Delete a single scan
async fn delete_handler<S: ScanStorage, T: DetectTransport>(
    State(state): State<Arc<AppState<S, T>>>,
    headers: HeaderMap,
    Path(scan_id): Path<String>,
) -> Result<Json<DeleteResponse>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = authorize(&state, &headers)?;

    let deleted = state.service.delete_scan(&user_id, &scan_id).await.map_err(|e| {
        error!("Failed to delete scan: {}", e);
        error_reply(e)
    })?;

    if deleted {
        Ok(Json(DeleteResponse {
            success: true,
            message: "Scan deleted successfully".to_string(),
        }))
    } else {
        Err((StatusCode::NOT_FOUND, Json(ErrorResponse::new("Scan not found", "NOT_FOUND"))))
    }
}

/// Delete every scan for the authenticated user
async fn delete_all_handler<S: ScanStorage, T: DetectTransport>(
    State(state): State<Arc<AppState<S, T>>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = authorize(&state, &headers)?;

    let count = state.service.delete_user_scans(&user_id).await.map_err(|e| {
        error!("Failed to delete scans: {}", e);
        error_reply(e)
    })?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Deleted {} scans", count),
        "count": count
    })))
}

/// Service status
async fn status_handler<S: ScanStorage, T: DetectTransport>(
    State(_state): State<Arc<AppState<S, T>>>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        service: "dermascan-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Health check
async fn health_handler<S: ScanStorage, T: DetectTransport>(
    State(state): State<Arc<AppState<S, T>>>,
) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    let total_scans = state.service.storage().count_scans().await.unwrap_or(0);

    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        total_scans,
        uptime_seconds: uptime,
    })
}
