// ABOUTME: Workout record database operations
// ABOUTME: Create, read, replace, delete, and filtered listing ordered by workout date

use chrono::NaiveDate;
use fitgoal_core::errors::{AppError, AppResult};
use fitgoal_core::models::{WorkoutFilter, WorkoutRecord};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{optional_uuid_column, timestamp_column, uuid_column, Database};

/// Column list shared by every workout query
const WORKOUT_COLUMNS: &str = "id, user_id, goal_id, name, workout_type, date, \
     duration_minutes, calories_burned, notes, created_at";

/// Dates are stored as ISO `YYYY-MM-DD` so TEXT comparison orders them
const DATE_FORMAT: &str = "%Y-%m-%d";

impl Database {
    /// Create the workouts table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_workouts(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                goal_id TEXT REFERENCES goals(id) ON DELETE SET NULL,
                name TEXT NOT NULL,
                workout_type TEXT NOT NULL,
                date TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
                calories_burned INTEGER NOT NULL CHECK (calories_burned > 0),
                notes TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workouts_user_date ON workouts(user_id, date)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_workouts_goal_id ON workouts(goal_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a workout
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_workout(&self, workout: &WorkoutRecord) -> AppResult<Uuid> {
        sqlx::query(
            r"
            INSERT INTO workouts (
                id, user_id, goal_id, name, workout_type, date,
                duration_minutes, calories_burned, notes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(workout.id.to_string())
        .bind(workout.user_id.to_string())
        .bind(workout.goal_id.map(|id| id.to_string()))
        .bind(&workout.name)
        .bind(&workout.workout_type)
        .bind(workout.date.format(DATE_FORMAT).to_string())
        .bind(workout.duration_minutes)
        .bind(workout.calories_burned)
        .bind(&workout.notes)
        .bind(workout.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(workout.id)
    }

    /// Get a workout by id, scoped to its owner
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_workout(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
    ) -> AppResult<Option<WorkoutRecord>> {
        let query =
            format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2");
        let row = sqlx::query(&query)
            .bind(workout_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_workout).transpose()
    }

    /// Replace the mutable fields of a stored workout
    ///
    /// Returns `false` when no row owned by the user matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_workout(&self, workout: &WorkoutRecord) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE workouts SET
                goal_id = $3,
                name = $4,
                workout_type = $5,
                date = $6,
                duration_minutes = $7,
                calories_burned = $8,
                notes = $9
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(workout.id.to_string())
        .bind(workout.user_id.to_string())
        .bind(workout.goal_id.map(|id| id.to_string()))
        .bind(&workout.name)
        .bind(&workout.workout_type)
        .bind(workout.date.format(DATE_FORMAT).to_string())
        .bind(workout.duration_minutes)
        .bind(workout.calories_burned)
        .bind(&workout.notes)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a workout owned by the user
    ///
    /// Returns `false` when no row matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete_workout(&self, user_id: Uuid, workout_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List a user's workouts matching `filter`, date ascending
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_workouts(
        &self,
        user_id: Uuid,
        filter: &WorkoutFilter,
    ) -> AppResult<Vec<WorkoutRecord>> {
        let query = format!(
            r"
            SELECT {WORKOUT_COLUMNS} FROM workouts
            WHERE user_id = $1
              AND ($2 IS NULL OR goal_id = $2)
              AND ($3 IS NULL OR date >= $3)
              AND ($4 IS NULL OR date <= $4)
            ORDER BY date ASC, created_at ASC, id ASC
            "
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(filter.goal_id.map(|id| id.to_string()))
            .bind(filter.from.map(|d| d.format(DATE_FORMAT).to_string()))
            .bind(filter.to.map(|d| d.format(DATE_FORMAT).to_string()))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_workout).collect()
    }

    fn row_to_workout(row: &SqliteRow) -> AppResult<WorkoutRecord> {
        let raw_date: String = row.try_get("date")?;
        let date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT)
            .map_err(|e| AppError::database(format!("Invalid workout date {raw_date}: {e}")))?;

        Ok(WorkoutRecord {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            goal_id: optional_uuid_column(row, "goal_id")?,
            name: row.try_get("name")?,
            workout_type: row.try_get("workout_type")?,
            date,
            duration_minutes: row.try_get("duration_minutes")?,
            calories_burned: row.try_get("calories_burned")?,
            notes: row.try_get("notes")?,
            created_at: timestamp_column(row, "created_at")?,
        })
    }
}
