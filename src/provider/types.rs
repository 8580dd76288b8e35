//! Wire types for the provider's detect response
//!
//! Every attribute is optional and, where present, may arrive either as a
//! bare number or wrapped in a `{ "value": ... }` object depending on the
//! provider API version. `AttrValue` absorbs both shapes; anything else
//! reads as absent.

use serde::Deserialize;

/// Top-level detect response
#[derive(Debug, Clone, Deserialize)]
pub struct DetectResponse {
    #[serde(default)]
    pub faces: Vec<Face>,
    pub error_message: Option<String>,
    pub request_id: Option<String>,
    pub time_used: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Face {
    pub attributes: Option<FaceAttributes>,
}

/// Attribute blocks requested via `return_attributes`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaceAttributes {
    pub age: Option<AttrValue>,
    pub emotion: Option<EmotionScores>,
    pub beauty: Option<BeautyScores>,
    pub skinstatus: Option<SkinStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmotionScores {
    pub happiness: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BeautyScores {
    pub female_score: Option<f64>,
    pub male_score: Option<f64>,
}

/// Skin condition signals, all on a 0-100 native scale
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkinStatus {
    pub health: Option<AttrValue>,
    pub stain: Option<AttrValue>,
    pub acne: Option<AttrValue>,
    pub dark_circle: Option<AttrValue>,
    pub pore: Option<AttrValue>,
    pub oily: Option<AttrValue>,
    pub moisture: Option<AttrValue>,
    pub wrinkle: Option<AttrValue>,
}

/// A raw attribute in either wire shape
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Wrapped { value: Option<f64> },
    /// Unknown shape, treated as absent
    Other(serde_json::Value),
}

impl AttrValue {
    /// Unwrap whichever shape arrived; unknown shapes yield None
    pub fn value(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Wrapped { value } => *value,
            AttrValue::Other(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_value_bare_number() {
        let attr: AttrValue = serde_json::from_str("42.5").unwrap();
        assert_eq!(attr.value(), Some(42.5));
    }

    #[test]
    fn test_attr_value_wrapped() {
        let attr: AttrValue = serde_json::from_str(r#"{"value": 28}"#).unwrap();
        assert_eq!(attr.value(), Some(28.0));
    }

    #[test]
    fn test_attr_value_wrapped_null() {
        let attr: AttrValue = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(attr.value(), None);
    }

    #[test]
    fn test_attr_value_unknown_shapes_are_absent() {
        let attr: AttrValue = serde_json::from_str(r#"{"threshold": 3}"#).unwrap();
        assert_eq!(attr.value(), None);

        let attr: AttrValue = serde_json::from_str("true").unwrap();
        assert_eq!(attr.value(), None);

        let attr: AttrValue = serde_json::from_str(r#""high""#).unwrap();
        assert_eq!(attr.value(), None);
    }

    #[test]
    fn test_detect_response_with_faces() {
        let body = r#"{
            "request_id": "1625123456,abc",
            "time_used": 250,
            "faces": [{
                "attributes": {
                    "age": {"value": 28},
                    "emotion": {"happiness": 90.0, "sadness": 1.2},
                    "beauty": {"female_score": 85.0, "male_score": 78.0},
                    "skinstatus": {"health": 90, "stain": 5.0, "acne": 5, "dark_circle": 10}
                }
            }]
        }"#;

        let response: DetectResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.faces.len(), 1);
        assert!(response.error_message.is_none());

        let attrs = response.faces[0].attributes.as_ref().unwrap();
        assert_eq!(attrs.age.as_ref().unwrap().value(), Some(28.0));
        assert_eq!(attrs.emotion.as_ref().unwrap().happiness, Some(90.0));

        let skin = attrs.skinstatus.as_ref().unwrap();
        assert_eq!(skin.health.as_ref().unwrap().value(), Some(90.0));
        // Not in this payload at all
        assert!(skin.pore.is_none());
    }

    #[test]
    fn test_detect_response_error_only() {
        let body = r#"{"error_message": "AUTHENTICATION_ERROR: api_key invalid"}"#;
        let response: DetectResponse = serde_json::from_str(body).unwrap();
        assert!(response.faces.is_empty());
        assert!(response.error_message.unwrap().contains("AUTHENTICATION_ERROR"));
    }

    #[test]
    fn test_face_without_attributes() {
        let response: DetectResponse = serde_json::from_str(r#"{"faces": [{}]}"#).unwrap();
        assert!(response.faces[0].attributes.is_none());
    }
}
