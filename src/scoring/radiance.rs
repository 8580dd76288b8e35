//! Radiance evaluation
//!
//! A confident smile brightens the reported score: happiness above the
//! gate applies a bonus multiplier to the beauty score, capped at 100.

use serde::{Deserialize, Serialize};

/// Happiness must exceed this (strictly) to earn the bonus
const SMILE_GATE: f64 = 80.0;
const BONUS_MULTIPLIER: f64 = 1.1;
/// Beauty score used when the provider supplies neither gender score
const DEFAULT_BEAUTY: f64 = 70.0;

/// Radiance evaluation outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Radiance {
    pub score: u8,
    pub has_bonus: bool,
    /// Happiness rescaled to [0, 1]
    pub smile_probability: f64,
}

/// Evaluate radiance from the expression and beauty signals
pub fn evaluate_radiance(
    happiness: Option<f64>,
    female_score: Option<f64>,
    male_score: Option<f64>,
) -> Radiance {
    let happiness = happiness.unwrap_or(0.0);
    let multiplier = if happiness > SMILE_GATE {
        BONUS_MULTIPLIER
    } else {
        1.0
    };
    let beauty = female_score.or(male_score).unwrap_or(DEFAULT_BEAUTY);
    let score = (beauty * multiplier).min(100.0).round() as u8;

    Radiance {
        score,
        has_bonus: multiplier > 1.0,
        smile_probability: happiness / 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_above_gate() {
        let radiance = evaluate_radiance(Some(85.0), Some(85.0), None);
        assert!(radiance.has_bonus);
        assert_eq!(radiance.score, 94); // round(85 * 1.1)
        assert!((radiance.smile_probability - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_gate_is_strict() {
        let radiance = evaluate_radiance(Some(80.0), Some(85.0), None);
        assert!(!radiance.has_bonus);
        assert_eq!(radiance.score, 85);
    }

    #[test]
    fn test_absent_happiness_means_no_smile() {
        let radiance = evaluate_radiance(None, Some(60.0), None);
        assert!(!radiance.has_bonus);
        assert_eq!(radiance.score, 60);
        assert_eq!(radiance.smile_probability, 0.0);
    }

    #[test]
    fn test_beauty_fallback_chain() {
        assert_eq!(evaluate_radiance(None, None, Some(78.0)).score, 78);
        assert_eq!(evaluate_radiance(None, None, None).score, 70);
        // Female score wins when both are present
        assert_eq!(evaluate_radiance(None, Some(82.0), Some(78.0)).score, 82);
    }

    #[test]
    fn test_bonus_caps_at_100() {
        let radiance = evaluate_radiance(Some(95.0), Some(98.0), None);
        assert!(radiance.has_bonus);
        assert_eq!(radiance.score, 100);
    }
}
