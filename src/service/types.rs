//! Service layer types

use serde::{Deserialize, Serialize};

use crate::scoring::{AgingStructure, Clarity, PigmentationTone, SkinType, SurfaceTexture};

/// One completed analysis, returned to the caller and persisted verbatim
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Final blended score
    pub score: u8,
    pub skin_age: i32,
    pub skin_type: SkinType,
    pub surface_texture: SurfaceTexture,
    pub pigmentation_tone: PigmentationTone,
    pub clarity: Clarity,
    pub aging_structure: AgingStructure,
    pub radiance_score: u8,
    pub has_radiance_bonus: bool,
    pub smile_probability: f64,
}

/// Per-user journal summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalStats {
    pub total_scans: i64,
    pub today_scans: i64,
    pub average_score: Option<f64>,
    pub best_score: Option<u8>,
    pub latest_scan_at: Option<i64>,
}
