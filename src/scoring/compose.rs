//! Final score composition

/// Weight of the technical (category-mean) score
const TECHNICAL_WEIGHT: f64 = 0.7;
/// Weight of the radiance score
const RADIANCE_WEIGHT: f64 = 0.3;

/// Blend the technical and radiance scores into the reported final score.
///
/// The weights are a fixed policy, not runtime configuration. Both inputs
/// are bounded to [0, 100], so the result is too.
pub fn compose_final_score(technical: u8, radiance: u8) -> u8 {
    (technical as f64 * TECHNICAL_WEIGHT + radiance as f64 * RADIANCE_WEIGHT).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_blend() {
        // 80 * 0.7 + 70 * 0.3 = 56 + 21 = 77
        assert_eq!(compose_final_score(80, 70), 77);
        // 88 * 0.7 + 94 * 0.3 = 61.6 + 28.2 = 89.8
        assert_eq!(compose_final_score(88, 94), 90);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(compose_final_score(0, 0), 0);
        assert_eq!(compose_final_score(100, 100), 100);
    }
}
