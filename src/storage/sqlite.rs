//! SQLite storage implementation

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

use super::traits::{ScanRecord, ScanStorage};
use crate::scoring::SkinType;

/// SQLite-based scan journal
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Create a new SQLite storage
    pub async fn new(db_path: &str) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = Path::new(db_path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", db_path);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;

        let storage = Self { pool };
        storage.initialize().await?;

        Ok(storage)
    }

    /// Initialize database schema
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS scans (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                score INTEGER NOT NULL,
                skin_age INTEGER NOT NULL,
                skin_type TEXT NOT NULL,
                surface_texture TEXT NOT NULL,
                pigmentation_tone TEXT NOT NULL,
                clarity TEXT NOT NULL,
                aging_structure TEXT NOT NULL,
                radiance_score INTEGER NOT NULL,
                has_radiance_bonus INTEGER NOT NULL,
                smile_probability REAL NOT NULL,
                image_uri TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_scans_user_id ON scans(user_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_scans_created_at ON scans(created_at DESC)")
            .execute(&self.pool)
            .await?;

        info!("SQLite database initialized");
        Ok(())
    }
}

fn record_from_row(row: &SqliteRow) -> Result<ScanRecord> {
    let skin_type: String = row.get("skin_type");
    let surface_texture: String = row.get("surface_texture");
    let pigmentation_tone: String = row.get("pigmentation_tone");
    let clarity: String = row.get("clarity");
    let aging_structure: String = row.get("aging_structure");

    Ok(ScanRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        score: row.get::<i64, _>("score") as u8,
        skin_age: row.get("skin_age"),
        skin_type: SkinType::from_name(&skin_type).unwrap_or(SkinType::Normal),
        surface_texture: serde_json::from_str(&surface_texture)
            .context("Invalid surface_texture blob")?,
        pigmentation_tone: serde_json::from_str(&pigmentation_tone)
            .context("Invalid pigmentation_tone blob")?,
        clarity: serde_json::from_str(&clarity).context("Invalid clarity blob")?,
        aging_structure: serde_json::from_str(&aging_structure)
            .context("Invalid aging_structure blob")?,
        radiance_score: row.get::<i64, _>("radiance_score") as u8,
        has_radiance_bonus: row.get("has_radiance_bonus"),
        smile_probability: row.get("smile_probability"),
        image_uri: row.get("image_uri"),
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl ScanStorage for SqliteStorage {
    async fn save_scan(&self, record: &ScanRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO scans (
                id, user_id, score, skin_age, skin_type,
                surface_texture, pigmentation_tone, clarity, aging_structure,
                radiance_score, has_radiance_bonus, smile_probability,
                image_uri, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(record.score as i64)
        .bind(record.skin_age)
        .bind(record.skin_type.as_str())
        .bind(serde_json::to_string(&record.surface_texture)?)
        .bind(serde_json::to_string(&record.pigmentation_tone)?)
        .bind(serde_json::to_string(&record.clarity)?)
        .bind(serde_json::to_string(&record.aging_structure)?)
        .bind(record.radiance_score as i64)
        .bind(record.has_radiance_bonus)
        .bind(record.smile_probability)
        .bind(&record.image_uri)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        debug!("Saved scan: {} (user {})", record.id, record.user_id);
        Ok(())
    }

    async fn get_scan(&self, scan_id: &str) -> Result<Option<ScanRecord>> {
        let row = sqlx::query("SELECT * FROM scans WHERE id = ?")
            .bind(scan_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(record_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn scans_for_user(&self, user_id: &str) -> Result<Vec<ScanRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM scans
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(record_from_row).collect()
    }

    async fn delete_scan(&self, scan_id: &str, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM scans WHERE id = ? AND user_id = ?")
            .bind(scan_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user_scans(&self, user_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM scans WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count_scans(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM scans")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::SkinStatus;
    use crate::scoring::CategoryScores;
    use tempfile::tempdir;

    fn sample_record(id: &str, user_id: &str, created_at: i64) -> ScanRecord {
        let categories = CategoryScores::from_skin_status(&SkinStatus::default());
        ScanRecord {
            id: id.to_string(),
            user_id: user_id.to_string(),
            score: 82,
            skin_age: 28,
            skin_type: SkinType::Combination,
            surface_texture: categories.surface_texture,
            pigmentation_tone: categories.pigmentation_tone,
            clarity: categories.clarity,
            aging_structure: categories.aging_structure,
            radiance_score: 88,
            has_radiance_bonus: true,
            smile_probability: 0.9,
            image_uri: "data:image/jpeg;base64,aW1hZ2U=".to_string(),
            created_at,
        }
    }

    #[tokio::test]
    async fn test_save_and_get_scan() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(db_path.to_str().unwrap()).await.unwrap();

        let record = sample_record("scan-001", "user-001", 1700000000);
        storage.save_scan(&record).await.unwrap();

        let retrieved = storage.get_scan("scan-001").await.unwrap().unwrap();
        assert_eq!(retrieved.user_id, "user-001");
        assert_eq!(retrieved.score, 82);
        assert_eq!(retrieved.skin_type, SkinType::Combination);
        assert!(retrieved.has_radiance_bonus);
        // Category blobs survive the JSON round trip
        assert_eq!(retrieved.surface_texture, record.surface_texture);
        assert_eq!(retrieved.aging_structure, record.aging_structure);

        let count = storage.count_scans().await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(db_path.to_str().unwrap()).await.unwrap();

        storage
            .save_scan(&sample_record("scan-a", "user-001", 100))
            .await
            .unwrap();
        storage
            .save_scan(&sample_record("scan-b", "user-001", 300))
            .await
            .unwrap();
        storage
            .save_scan(&sample_record("scan-c", "user-001", 200))
            .await
            .unwrap();

        let scans = storage.scans_for_user("user-001").await.unwrap();
        let ids: Vec<&str> = scans.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["scan-b", "scan-c", "scan-a"]);
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(db_path.to_str().unwrap()).await.unwrap();

        storage
            .save_scan(&sample_record("scan-001", "user-001", 100))
            .await
            .unwrap();

        // A different user cannot delete it
        let deleted = storage.delete_scan("scan-001", "user-002").await.unwrap();
        assert!(!deleted);
        assert!(storage.get_scan("scan-001").await.unwrap().is_some());

        let deleted = storage.delete_scan("scan-001", "user-001").await.unwrap();
        assert!(deleted);
        assert!(storage.get_scan("scan-001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_user_scans_cascade() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(db_path.to_str().unwrap()).await.unwrap();

        storage
            .save_scan(&sample_record("scan-a", "user-001", 100))
            .await
            .unwrap();
        storage
            .save_scan(&sample_record("scan-b", "user-001", 200))
            .await
            .unwrap();
        storage
            .save_scan(&sample_record("scan-c", "user-002", 300))
            .await
            .unwrap();

        let removed = storage.delete_user_scans("user-001").await.unwrap();
        assert_eq!(removed, 2);

        assert!(storage.scans_for_user("user-001").await.unwrap().is_empty());
        assert_eq!(storage.scans_for_user("user-002").await.unwrap().len(), 1);
        assert_eq!(storage.count_scans().await.unwrap(), 1);
    }
}
