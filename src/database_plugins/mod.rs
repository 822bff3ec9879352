// ABOUTME: Storage abstraction used by services and routes
// ABOUTME: Object-safe async trait so tests can wrap or replace the SQLite backend

use async_trait::async_trait;
use fitgoal_core::errors::AppResult;
use fitgoal_core::models::{Goal, PersistedSummary, User, WorkoutFilter, WorkoutRecord};
use uuid::Uuid;

pub mod sqlite;

/// Core storage abstraction
///
/// Every workout and goal read is scoped to an owner; a record that exists
/// but belongs to someone else is reported as absent.
#[async_trait]
pub trait DatabaseProvider: Send + Sync {
    /// Check the store answers queries
    async fn ping(&self) -> AppResult<()>;

    // ================================
    // Users
    // ================================

    /// Create a new user account
    async fn create_user(&self, user: &User) -> AppResult<Uuid>;

    /// Get user by ID
    async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>>;

    /// Get user by email address
    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    // ================================
    // Workouts
    // ================================

    /// Insert a workout
    async fn create_workout(&self, workout: &WorkoutRecord) -> AppResult<Uuid>;

    /// Get one of the user's workouts
    async fn get_workout(&self, user_id: Uuid, workout_id: Uuid)
        -> AppResult<Option<WorkoutRecord>>;

    /// Replace a workout's fields, `false` if it was not found
    async fn update_workout(&self, workout: &WorkoutRecord) -> AppResult<bool>;

    /// Delete a workout, `false` if it was not found
    async fn delete_workout(&self, user_id: Uuid, workout_id: Uuid) -> AppResult<bool>;

    /// List the user's workouts, date ascending
    async fn list_workouts(
        &self,
        user_id: Uuid,
        filter: &WorkoutFilter,
    ) -> AppResult<Vec<WorkoutRecord>>;

    // ================================
    // Goals
    // ================================

    /// Insert a goal; duplicate names fail with `ResourceAlreadyExists`
    async fn create_goal(&self, goal: &Goal) -> AppResult<Uuid>;

    /// Get one of the user's goals
    async fn get_goal(&self, user_id: Uuid, goal_id: Uuid) -> AppResult<Option<Goal>>;

    /// Find a goal by exact name, any owner
    async fn get_goal_by_name(&self, goal_name: &str) -> AppResult<Option<Goal>>;

    /// List the user's goals
    async fn list_goals(&self, user_id: Uuid) -> AppResult<Vec<Goal>>;

    // ================================
    // Progress summaries
    // ================================

    /// Insert or replace the user's summary row
    async fn upsert_summary(&self, summary: &PersistedSummary) -> AppResult<()>;

    /// Read the user's summary row
    async fn get_summary(&self, user_id: Uuid) -> AppResult<Option<PersistedSummary>>;
}
