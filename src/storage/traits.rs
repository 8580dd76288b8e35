//! Storage abstraction traits
//!
//! Defines the interface for scan journal persistence. The analysis
//! pipeline never talks to a concrete database.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::scoring::{AgingStructure, Clarity, PigmentationTone, SkinType, SurfaceTexture};

/// A persisted scan: one analysis result owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    /// Unique scan ID (UUID)
    pub id: String,
    /// Owning user
    pub user_id: String,
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
    /// Client-supplied image reference (data URL or remote URI)
    pub image_uri: String,
    /// Creation timestamp (unix seconds)
    pub created_at: i64,
}

/// Scan journal storage
/// Implementations must be thread-safe and async-compatible
#[async_trait]
pub trait ScanStorage: Send + Sync + 'static {
    /// Persist a new scan
    async fn save_scan(&self, record: &ScanRecord) -> Result<()>;

    /// Get a scan by ID
    async fn get_scan(&self, scan_id: &str) -> Result<Option<ScanRecord>>;

    /// All scans for a user, newest first
    async fn scans_for_user(&self, user_id: &str) -> Result<Vec<ScanRecord>>;

    /// Delete one scan if it belongs to the user
    async fn delete_scan(&self, scan_id: &str, user_id: &str) -> Result<bool>;

    /// Delete every scan owned by a user (account-deletion cascade)
    async fn delete_user_scans(&self, user_id: &str) -> Result<u64>;

    /// Total scan count across all users
    async fn count_scans(&self) -> Result<i64>;
}
