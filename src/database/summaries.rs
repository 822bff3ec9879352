// ABOUTME: Persisted progress summary database operations
// ABOUTME: One row per user, replaced wholesale by an upsert on every refresh

use fitgoal_core::errors::{AppError, AppResult};
use fitgoal_core::models::{OverallSummary, PersistedSummary};
use sqlx::Row;
use uuid::Uuid;

use super::{timestamp_column, uuid_column, Database};

impl Database {
    /// Create the `progress_summaries` table
    ///
    /// Headline totals are stored in their own columns next to the full
    /// summary document for ad-hoc querying.
    ///
    /// # Errors
    ///
    /// Returns an error if table creation fails
    pub(super) async fn migrate_summaries(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS progress_summaries (
                user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
                total_workouts INTEGER NOT NULL,
                total_calories_burned INTEGER NOT NULL,
                total_duration_minutes INTEGER NOT NULL,
                remaining_calories INTEGER NOT NULL,
                remaining_duration_minutes INTEGER NOT NULL,
                summary_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert or replace the user's summary row
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the upsert fails
    pub async fn upsert_summary(&self, persisted: &PersistedSummary) -> AppResult<()> {
        let summary = &persisted.summary;
        let summary_json = serde_json::to_string(summary)?;

        sqlx::query(
            r"
            INSERT INTO progress_summaries (
                user_id, total_workouts, total_calories_burned, total_duration_minutes,
                remaining_calories, remaining_duration_minutes, summary_json, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT(user_id) DO UPDATE SET
                total_workouts = excluded.total_workouts,
                total_calories_burned = excluded.total_calories_burned,
                total_duration_minutes = excluded.total_duration_minutes,
                remaining_calories = excluded.remaining_calories,
                remaining_duration_minutes = excluded.remaining_duration_minutes,
                summary_json = excluded.summary_json,
                updated_at = excluded.updated_at
            ",
        )
        .bind(persisted.user_id.to_string())
        .bind(summary.total_workouts)
        .bind(summary.total_calories_burned)
        .bind(summary.total_duration_minutes)
        .bind(summary.remaining_calories)
        .bind(summary.remaining_duration_minutes)
        .bind(summary_json)
        .bind(persisted.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Read the user's persisted summary, if one was ever written
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored document is corrupt
    pub async fn get_summary(&self, user_id: Uuid) -> AppResult<Option<PersistedSummary>> {
        let row = sqlx::query(
            "SELECT user_id, summary_json, updated_at FROM progress_summaries WHERE user_id = $1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let raw: String = row.try_get("summary_json")?;
        let summary: OverallSummary = serde_json::from_str(&raw).map_err(|e| {
            AppError::database(format!("Stored progress summary is unreadable: {e}"))
        })?;

        Ok(Some(PersistedSummary {
            user_id: uuid_column(&row, "user_id")?,
            summary,
            updated_at: timestamp_column(&row, "updated_at")?,
        }))
    }
}
