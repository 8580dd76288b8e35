//! Attribute normalization
//!
//! Provider attributes arrive on inconsistent native scales and may be
//! absent per face. Normalization maps every attribute onto a bounded
//! 0-100 integer metric with a deterministic fallback, so downstream
//! arithmetic never sees a missing value.

use crate::provider::AttrValue;

/// Normalize a raw attribute onto the 0-100 metric scale.
///
/// Absent or non-finite values become `fallback` unchanged (no scaling is
/// applied to the fallback). Present values are scaled by `max`, clamped
/// to [0, 100], then inverted when the raw signal counts defects rather
/// than quality.
pub fn normalize_score(raw: Option<f64>, max: f64, inverse: bool, fallback: u8) -> u8 {
    let value = match raw {
        Some(v) if v.is_finite() => v,
        _ => return fallback,
    };

    let clamped = (value / max * 100.0).clamp(0.0, 100.0);
    let score = if inverse { 100.0 - clamped } else { clamped };
    score.round() as u8
}

/// Unwrap a raw attribute in either wire shape
pub fn extract_value(attr: Option<&AttrValue>) -> Option<f64> {
    attr.and_then(AttrValue::value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_and_bounded() {
        let mut previous = 0u8;
        for v in 0..=100 {
            let score = normalize_score(Some(v as f64), 100.0, false, 50);
            assert!(score <= 100);
            assert!(score >= previous, "not monotonic at v={}", v);
            previous = score;
        }
    }

    #[test]
    fn test_absent_returns_fallback_unscaled() {
        assert_eq!(normalize_score(None, 100.0, false, 50), 50);
        assert_eq!(normalize_score(None, 5.0, false, 75), 75);
        // Inversion never applies to the fallback
        assert_eq!(normalize_score(None, 100.0, true, 75), 75);
    }

    #[test]
    fn test_non_finite_returns_fallback() {
        assert_eq!(normalize_score(Some(f64::NAN), 100.0, false, 50), 50);
        assert_eq!(normalize_score(Some(f64::INFINITY), 100.0, true, 75), 75);
    }

    #[test]
    fn test_clamps_before_inversion() {
        assert_eq!(normalize_score(Some(150.0), 100.0, false, 50), 100);
        assert_eq!(normalize_score(Some(-10.0), 100.0, false, 50), 0);
        assert_eq!(normalize_score(Some(150.0), 100.0, true, 50), 0);
        assert_eq!(normalize_score(Some(-10.0), 100.0, true, 50), 100);
    }

    #[test]
    fn test_inverse_flips_scale() {
        assert_eq!(normalize_score(Some(20.0), 100.0, true, 50), 80);
        assert_eq!(normalize_score(Some(0.0), 100.0, true, 50), 100);
        assert_eq!(normalize_score(Some(100.0), 100.0, true, 50), 0);
    }

    #[test]
    fn test_scales_by_max() {
        assert_eq!(normalize_score(Some(2.5), 5.0, false, 50), 50);
        assert_eq!(normalize_score(Some(5.0), 5.0, false, 50), 100);
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(normalize_score(Some(87.5), 100.0, false, 50), 88);
        assert_eq!(normalize_score(Some(12.4), 100.0, false, 50), 12);
    }

    #[test]
    fn test_extract_value_shapes() {
        assert_eq!(extract_value(Some(&AttrValue::Number(30.0))), Some(30.0));
        assert_eq!(
            extract_value(Some(&AttrValue::Wrapped { value: Some(28.0) })),
            Some(28.0)
        );
        assert_eq!(extract_value(Some(&AttrValue::Wrapped { value: None })), None);
        assert_eq!(extract_value(None), None);
    }
}
