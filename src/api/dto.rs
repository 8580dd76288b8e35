//! REST API request/response data transfer objects

use serde::{Deserialize, Serialize};

use crate::service::AnalysisResult;
use crate::storage::ScanRecord;

/// Analyze request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub image_base64: String,
}

/// Save scan request: a finished analysis plus the client-side image URI
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveScanRequest {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub image_uri: String,
}

/// Scan history response
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub scans: Vec<ScanRecord>,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// Service status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: String,
    pub total_scans: i64,
    pub uptime_seconds: u64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            code: code.to_string(),
        }
    }
}
