//! Analysis orchestration
//!
//! Sequences the provider gateway and the scoring pipeline into one
//! analysis result, and owns the scan journal operations on top of the
//! storage trait.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::provider::{DetectTransport, FaceAttributes, FaceppGateway};
use crate::scoring::{
    classify_skin_type, compose_final_score, evaluate_radiance, extract_value, CategoryScores,
};
use crate::storage::{ScanRecord, ScanStorage};
use crate::utils::image::base64_payload;

use super::types::{AnalysisResult, JournalStats};

/// Age range substituted when the provider omits the age attribute
const SKIN_AGE_FALLBACK: std::ops::Range<i32> = 25..40;

pub struct AnalysisService<S: ScanStorage, T: DetectTransport> {
    gateway: FaceppGateway<T>,
    storage: Arc<S>,
}

impl<S: ScanStorage, T: DetectTransport> AnalysisService<S, T> {
    pub fn new(gateway: FaceppGateway<T>, storage: Arc<S>) -> Self {
        Self { gateway, storage }
    }

    /// Run the full analysis pipeline for one image.
    ///
    /// All-or-nothing: any stage failure surfaces unchanged and no
    /// partial result is produced.
    pub async fn analyze(&self, image: &str) -> Result<AnalysisResult, AnalysisError> {
        let payload = base64_payload(image);
        let response = self.gateway.detect(payload).await?;

        // The gateway guarantees at least one face on success
        let face = response
            .faces
            .first()
            .ok_or(AnalysisError::NoFaceDetected)?;
        let attributes = face.attributes.clone().unwrap_or_default();

        let result = score_attributes(&attributes);
        info!(
            "Analysis complete: score={} skin_type={:?} radiance={}",
            result.score, result.skin_type, result.radiance_score
        );

        Ok(result)
    }

    /// Persist a finished analysis into the caller's journal
    pub async fn save_scan(
        &self,
        user_id: &str,
        result: &AnalysisResult,
        image_uri: &str,
    ) -> Result<ScanRecord, AnalysisError> {
        let record = ScanRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            score: result.score,
            skin_age: result.skin_age,
            skin_type: result.skin_type,
            surface_texture: result.surface_texture,
            pigmentation_tone: result.pigmentation_tone,
            clarity: result.clarity,
            aging_structure: result.aging_structure,
            radiance_score: result.radiance_score,
            has_radiance_bonus: result.has_radiance_bonus,
            smile_probability: result.smile_probability,
            image_uri: image_uri.to_string(),
            created_at: now_unix(),
        };

        self.storage.save_scan(&record).await?;
        debug!("Scan {} saved for user {}", record.id, user_id);

        Ok(record)
    }

    /// Scan history for a user, newest first
    pub async fn history(&self, user_id: &str) -> Result<Vec<ScanRecord>, AnalysisError> {
        Ok(self.storage.scans_for_user(user_id).await?)
    }

    /// Journal summary for a user
    pub async fn stats(&self, user_id: &str) -> Result<JournalStats, AnalysisError> {
        let scans = self.storage.scans_for_user(user_id).await?;

        let today_start = chrono::Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp();

        let total_scans = scans.len() as i64;
        let today_scans = scans
            .iter()
            .filter(|s| s.created_at >= today_start)
            .count() as i64;
        let average_score = if scans.is_empty() {
            None
        } else {
            Some(scans.iter().map(|s| s.score as f64).sum::<f64>() / scans.len() as f64)
        };
        let best_score = scans.iter().map(|s| s.score).max();
        let latest_scan_at = scans.iter().map(|s| s.created_at).max();

        Ok(JournalStats {
            total_scans,
            today_scans,
            average_score,
            best_score,
            latest_scan_at,
        })
    }

    /// Delete one scan from the caller's journal
    pub async fn delete_scan(&self, user_id: &str, scan_id: &str) -> Result<bool, AnalysisError> {
        Ok(self.storage.delete_scan(scan_id, user_id).await?)
    }

    /// Remove every scan for a user (account deletion)
    pub async fn delete_user_scans(&self, user_id: &str) -> Result<u64, AnalysisError> {
        let removed = self.storage.delete_user_scans(user_id).await?;
        info!("Removed {} scan(s) for user {}", removed, user_id);
        Ok(removed)
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Apply the scoring pipeline to one face's attributes
fn score_attributes(attributes: &FaceAttributes) -> AnalysisResult {
    let skin = attributes.skinstatus.clone().unwrap_or_default();
    let categories = CategoryScores::from_skin_status(&skin);
    let technical = categories.technical_score();

    let happiness = attributes.emotion.as_ref().and_then(|e| e.happiness);
    let (female, male) = attributes
        .beauty
        .as_ref()
        .map(|b| (b.female_score, b.male_score))
        .unwrap_or((None, None));
    let radiance = evaluate_radiance(happiness, female, male);

    let score = compose_final_score(technical, radiance.score);

    let skin_type = classify_skin_type(
        extract_value(skin.oily.as_ref()),
        extract_value(skin.moisture.as_ref()),
        extract_value(skin.acne.as_ref()),
    );

    let skin_age = extract_value(attributes.age.as_ref())
        .map(|age| age.round() as i32)
        .unwrap_or_else(|| rand::thread_rng().gen_range(SKIN_AGE_FALLBACK));

    AnalysisResult {
        score,
        skin_age,
        skin_type,
        surface_texture: categories.surface_texture,
        pigmentation_tone: categories.pigmentation_tone,
        clarity: categories.clarity,
        aging_structure: categories.aging_structure,
        radiance_score: radiance.score,
        has_radiance_bonus: radiance.has_bonus,
        smile_probability: radiance.smile_probability,
    }
}

fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
