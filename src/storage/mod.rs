//! Storage module for scan journal persistence

pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{ScanRecord, ScanStorage};
