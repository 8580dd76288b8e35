//! Score normalization and aggregation pipeline
//!
//! Pure functions from raw provider attributes to bounded integer scores:
//! normalize, aggregate into categories, evaluate radiance, compose.

pub mod categories;
pub mod compose;
pub mod normalize;
pub mod radiance;

pub use categories::{
    classify_skin_type, technical_score, AgingStructure, CategoryScores, Clarity,
    PigmentationTone, SkinType, SurfaceTexture,
};
pub use compose::compose_final_score;
pub use normalize::{extract_value, normalize_score};
pub use radiance::{evaluate_radiance, Radiance};
