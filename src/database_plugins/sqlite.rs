//! `SQLite` database implementation
//!
//! Wraps [`Database`] to implement the [`DatabaseProvider`] trait.

use async_trait::async_trait;
use fitgoal_core::errors::AppResult;
use fitgoal_core::models::{Goal, PersistedSummary, User, WorkoutFilter, WorkoutRecord};
use uuid::Uuid;

use super::DatabaseProvider;
use crate::config::DatabaseUrl;
use crate::database::Database;

/// `SQLite` database implementation
#[derive(Clone)]
pub struct SqliteDatabase {
    inner: Database,
}

impl SqliteDatabase {
    /// Open the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn new(url: &DatabaseUrl, max_connections: u32) -> AppResult<Self> {
        let inner = Database::new(url, max_connections).await?;
        Ok(Self { inner })
    }

    /// Get a reference to the inner database
    #[must_use]
    pub const fn inner(&self) -> &Database {
        &self.inner
    }
}

#[async_trait]
impl DatabaseProvider for SqliteDatabase {
    async fn ping(&self) -> AppResult<()> {
        self.inner.ping().await
    }

    async fn create_user(&self, user: &User) -> AppResult<Uuid> {
        self.inner.create_user(user).await
    }

    async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        self.inner.get_user(user_id).await
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.inner.get_user_by_email(email).await
    }

    async fn create_workout(&self, workout: &WorkoutRecord) -> AppResult<Uuid> {
        self.inner.create_workout(workout).await
    }

    async fn get_workout(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
    ) -> AppResult<Option<WorkoutRecord>> {
        self.inner.get_workout(user_id, workout_id).await
    }

    async fn update_workout(&self, workout: &WorkoutRecord) -> AppResult<bool> {
        self.inner.update_workout(workout).await
    }

    async fn delete_workout(&self, user_id: Uuid, workout_id: Uuid) -> AppResult<bool> {
        self.inner.delete_workout(user_id, workout_id).await
    }

    async fn list_workouts(
        &self,
        user_id: Uuid,
        filter: &WorkoutFilter,
    ) -> AppResult<Vec<WorkoutRecord>> {
        self.inner.list_workouts(user_id, filter).await
    }

    async fn create_goal(&self, goal: &Goal) -> AppResult<Uuid> {
        self.inner.create_goal(goal).await
    }

    async fn get_goal(&self, user_id: Uuid, goal_id: Uuid) -> AppResult<Option<Goal>> {
        self.inner.get_goal(user_id, goal_id).await
    }

    async fn get_goal_by_name(&self, goal_name: &str) -> AppResult<Option<Goal>> {
        self.inner.get_goal_by_name(goal_name).await
    }

    async fn list_goals(&self, user_id: Uuid) -> AppResult<Vec<Goal>> {
        self.inner.list_goals(user_id).await
    }

    async fn upsert_summary(&self, summary: &PersistedSummary) -> AppResult<()> {
        self.inner.upsert_summary(summary).await
    }

    async fn get_summary(&self, user_id: Uuid) -> AppResult<Option<PersistedSummary>> {
        self.inner.get_summary(user_id).await
    }
}
