// ABOUTME: Goal database operations
// ABOUTME: Goal names are globally unique, enforced by a UNIQUE column constraint

use fitgoal_core::errors::AppResult;
use fitgoal_core::models::Goal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{timestamp_column, uuid_column, Database};

/// Column list shared by every goal query
const GOAL_COLUMNS: &str = "id, user_id, goal_name, workout_type, calories_to_burn, \
     daily_target_calories, daily_time_minutes, duration_days, created_at";

impl Database {
    /// Create the goals table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_goals(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS goals (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                goal_name TEXT NOT NULL UNIQUE,
                workout_type TEXT NOT NULL,
                calories_to_burn INTEGER NOT NULL CHECK (calories_to_burn > 0),
                daily_target_calories INTEGER NOT NULL CHECK (daily_target_calories > 0),
                daily_time_minutes INTEGER NOT NULL CHECK (daily_time_minutes > 0),
                duration_days INTEGER NOT NULL CHECK (duration_days > 0),
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_goals_user_id ON goals(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a goal
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` when `goal_name` is taken, or a
    /// database error if the insert fails
    pub async fn create_goal(&self, goal: &Goal) -> AppResult<Uuid> {
        sqlx::query(
            r"
            INSERT INTO goals (
                id, user_id, goal_name, workout_type, calories_to_burn,
                daily_target_calories, daily_time_minutes, duration_days, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(goal.id.to_string())
        .bind(goal.user_id.to_string())
        .bind(&goal.goal_name)
        .bind(&goal.workout_type)
        .bind(goal.calories_to_burn)
        .bind(goal.daily_target_calories)
        .bind(goal.daily_time_minutes)
        .bind(goal.duration_days)
        .bind(goal.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(goal.id)
    }

    /// Get a goal by id, scoped to its owner
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_goal(&self, user_id: Uuid, goal_id: Uuid) -> AppResult<Option<Goal>> {
        let query = format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = $1 AND user_id = $2");
        let row = sqlx::query(&query)
            .bind(goal_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_goal).transpose()
    }

    /// Find a goal by exact name across all users
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_goal_by_name(&self, goal_name: &str) -> AppResult<Option<Goal>> {
        let query = format!("SELECT {GOAL_COLUMNS} FROM goals WHERE goal_name = $1");
        let row = sqlx::query(&query)
            .bind(goal_name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_goal).transpose()
    }

    /// List a user's goals, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_goals(&self, user_id: Uuid) -> AppResult<Vec<Goal>> {
        let query = format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE user_id = $1 ORDER BY created_at ASC, id ASC"
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_goal).collect()
    }

    fn row_to_goal(row: &SqliteRow) -> AppResult<Goal> {
        Ok(Goal {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            goal_name: row.try_get("goal_name")?,
            workout_type: row.try_get("workout_type")?,
            calories_to_burn: row.try_get("calories_to_burn")?,
            daily_target_calories: row.try_get("daily_target_calories")?,
            daily_time_minutes: row.try_get("daily_time_minutes")?,
            duration_days: row.try_get("duration_days")?,
            created_at: timestamp_column(row, "created_at")?,
        })
    }
}
