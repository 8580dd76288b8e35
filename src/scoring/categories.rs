//! Category aggregation
//!
//! Groups the normalized metrics into four fixed category records and
//! derives the composite technical score and the skin type. The mapping
//! table (which raw signal feeds which metric, with which inversion and
//! fallback) is part of the scoring contract and is preserved exactly,
//! including the reuse of `stain`, `health`, and `dark_circle` across
//! several fields.

use serde::{Deserialize, Serialize};

use super::normalize::{extract_value, normalize_score};
use crate::provider::SkinStatus;

/// Texture and hydration metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceTexture {
    pub texture: u8,
    pub pores: u8,
    pub oiliness: u8,
    pub moisture: u8,
}

/// Tone and discoloration metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PigmentationTone {
    pub spots: u8,
    pub redness: u8,
    pub dark_circles: u8,
}

/// Blemish metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clarity {
    pub acne: u8,
    pub tear_trough: u8,
}

/// Structural aging metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgingStructure {
    pub wrinkles: u8,
    pub firmness: u8,
    pub eyebags: u8,
    pub droopy_upper_eyelid: u8,
    pub droopy_lower_eyelid: u8,
}

/// The four category records for one analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryScores {
    pub surface_texture: SurfaceTexture,
    pub pigmentation_tone: PigmentationTone,
    pub clarity: Clarity,
    pub aging_structure: AgingStructure,
}

impl CategoryScores {
    /// Apply the fixed mapping table to the raw skin signals
    pub fn from_skin_status(skin: &SkinStatus) -> Self {
        let health = extract_value(skin.health.as_ref());
        let stain = extract_value(skin.stain.as_ref());
        let acne = extract_value(skin.acne.as_ref());
        let dark_circle = extract_value(skin.dark_circle.as_ref());
        let pore = extract_value(skin.pore.as_ref());
        let oily = extract_value(skin.oily.as_ref());
        let moisture = extract_value(skin.moisture.as_ref());
        let wrinkle = extract_value(skin.wrinkle.as_ref());

        Self {
            surface_texture: SurfaceTexture {
                texture: normalize_score(health, 100.0, false, 75),
                pores: normalize_score(pore, 100.0, true, 50),
                oiliness: normalize_score(oily, 100.0, true, 50),
                moisture: normalize_score(moisture, 100.0, false, 50),
            },
            pigmentation_tone: PigmentationTone {
                spots: normalize_score(stain, 100.0, true, 50),
                redness: normalize_score(stain, 100.0, true, 50),
                dark_circles: normalize_score(dark_circle, 100.0, true, 50),
            },
            clarity: Clarity {
                acne: normalize_score(acne, 100.0, true, 50),
                tear_trough: normalize_score(dark_circle, 100.0, true, 50),
            },
            aging_structure: AgingStructure {
                wrinkles: normalize_score(wrinkle, 100.0, true, 50),
                firmness: normalize_score(health, 100.0, false, 75),
                eyebags: normalize_score(dark_circle, 100.0, true, 50),
                droopy_upper_eyelid: normalize_score(health, 100.0, false, 75),
                droopy_lower_eyelid: normalize_score(dark_circle, 100.0, true, 50),
            },
        }
    }

    /// All 14 metrics in a fixed order
    pub fn metric_values(&self) -> [u8; 14] {
        [
            self.surface_texture.texture,
            self.surface_texture.pores,
            self.surface_texture.oiliness,
            self.surface_texture.moisture,
            self.pigmentation_tone.spots,
            self.pigmentation_tone.redness,
            self.pigmentation_tone.dark_circles,
            self.clarity.acne,
            self.clarity.tear_trough,
            self.aging_structure.wrinkles,
            self.aging_structure.firmness,
            self.aging_structure.eyebags,
            self.aging_structure.droopy_upper_eyelid,
            self.aging_structure.droopy_lower_eyelid,
        ]
    }

    /// Composite technical score for these categories
    pub fn technical_score(&self) -> u8 {
        technical_score(&self.metric_values())
    }
}

/// Mean of the given metrics, rounded; 75 when there is nothing to average
pub fn technical_score(metrics: &[u8]) -> u8 {
    if metrics.is_empty() {
        return 75;
    }
    let sum: u32 = metrics.iter().map(|&m| m as u32).sum();
    (sum as f64 / metrics.len() as f64).round() as u8
}

/// Skin type derived from the raw oily/moisture/acne signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkinType {
    Oily,
    Dry,
    Normal,
    Combination,
    Sensitive,
}

impl SkinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkinType::Oily => "Oily",
            SkinType::Dry => "Dry",
            SkinType::Normal => "Normal",
            SkinType::Combination => "Combination",
            SkinType::Sensitive => "Sensitive",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Oily" => Some(SkinType::Oily),
            "Dry" => Some(SkinType::Dry),
            "Normal" => Some(SkinType::Normal),
            "Combination" => Some(SkinType::Combination),
            "Sensitive" => Some(SkinType::Sensitive),
            _ => None,
        }
    }
}

/// Derive the skin type, first matching rule wins.
///
/// Works on raw (unnormalized) provider values with substituted defaults:
/// oily 50, moisture 50, acne 0 when absent. A present zero is a real
/// reading, not a missing one.
pub fn classify_skin_type(
    oily: Option<f64>,
    moisture: Option<f64>,
    acne: Option<f64>,
) -> SkinType {
    let oily = oily.unwrap_or(50.0);
    let moisture = moisture.unwrap_or(50.0);
    let acne = acne.unwrap_or(0.0);

    if oily > 60.0 {
        SkinType::Oily
    } else if moisture < 40.0 {
        SkinType::Dry
    } else if oily > 40.0 && moisture < 50.0 {
        SkinType::Combination
    } else if acne > 50.0 {
        SkinType::Sensitive
    } else {
        SkinType::Normal
    }
}
