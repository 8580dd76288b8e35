//! Skin Analysis Service Library

pub mod api;
pub mod config;
pub mod error;
pub mod provider;
pub mod scoring;
pub mod service;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use error::AnalysisError;
