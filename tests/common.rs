// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: In-memory store, scripted goal planner, failing store wrapper, and user helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `fitgoal_server`

use std::env;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use fitgoal_server::auth::AuthManager;
use fitgoal_server::config::{
    AuthConfig, DatabaseConfig, DatabaseUrl, Environment, HttpConfig, LlmConfig, ServerConfig,
};
use fitgoal_server::database_plugins::sqlite::SqliteDatabase;
use fitgoal_server::database_plugins::DatabaseProvider;
use fitgoal_server::errors::{AppError, AppResult, ErrorCode};
use fitgoal_server::llm::{ChatRequest, ChatResponse, LlmProvider};
use fitgoal_server::models::{
    Goal, GoalCandidate, PersistedSummary, User, WorkoutFilter, WorkoutInput, WorkoutRecord,
};
use fitgoal_server::resources::ServerResources;
use tracing::Level;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Lowest bcrypt cost, keeps hashing fast in tests
pub const TEST_BCRYPT_COST: u32 = 4;

/// Password used for every test account
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Well-formed planner reply for a running goal
pub const RUNNING_GOAL_JSON: &str = r#"{
    "goal_name": "Lose 2kg running",
    "workout_type": "running",
    "calories_to_burn": 15400,
    "duration_days": 30,
    "daily_target_calories": 700,
    "daily_time_minutes": 70
}"#;

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Configuration suitable for tests; never read from the environment
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_owned(),
        http_port: 0,
        environment: Environment::Testing,
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
            max_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "test-secret-that-is-long-enough-for-hs256-signing".to_owned(),
            jwt_expiry_minutes: 30,
        },
        llm: LlmConfig {
            base_url: "http://127.0.0.1:9".to_owned(),
            chat_path: "chat/completions".to_owned(),
            api_key: None,
            model: "scripted".to_owned(),
            api_key_header: "Authorization".to_owned(),
            host_header: None,
            timeout: Duration::from_secs(5),
        },
        http: HttpConfig {
            request_timeout: Duration::from_secs(30),
            cors_origins: vec!["*".to_owned()],
        },
    }
}

/// What a [`ScriptedLlm`] answers with
#[derive(Debug, Clone)]
pub enum Script {
    /// Return this text as the reply content
    Reply(String),
    /// Fail with this error code and message
    Fail(ErrorCode, String),
}

/// Goal planner double that answers every request the same way
pub struct ScriptedLlm {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            script: Script::Reply(text.to_owned()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(code: ErrorCode, message: &str) -> Arc<Self> {
        Arc::new(Self {
            script: Script::Fail(code, message.to_owned()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted test planner"
    }

    fn default_model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Reply(text) => Ok(ChatResponse {
                content: text.clone(),
                model: "scripted".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            Script::Fail(code, message) => Err(AppError::new(*code, message.clone())),
        }
    }
}

/// Store wrapper whose summary upserts, workout reads, and summary reads can
/// be switched to fail
pub struct FlakySummaryStore {
    inner: Arc<dyn DatabaseProvider>,
    fail_upserts: AtomicBool,
    fail_reads: AtomicBool,
    upserts: AtomicUsize,
}

impl FlakySummaryStore {
    pub fn wrap(inner: Arc<dyn DatabaseProvider>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            fail_upserts: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            upserts: AtomicUsize::new(0),
        })
    }

    pub fn set_fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    /// Fail `list_workouts` and `get_summary`
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_read(&self) -> AppResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::database("simulated read failure"));
        }
        Ok(())
    }

    /// Successful upserts so far
    pub fn upserts(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseProvider for FlakySummaryStore {
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
        self.check_read()?;
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
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(AppError::database("simulated summary write failure"));
        }
        self.inner.upsert_summary(summary).await?;
        self.upserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_summary(&self, user_id: Uuid) -> AppResult<Option<PersistedSummary>> {
        self.check_read()?;
        self.inner.get_summary(user_id).await
    }
}

/// Fresh in-memory store
pub async fn create_test_database() -> Result<Arc<dyn DatabaseProvider>> {
    init_test_logging();
    let database = SqliteDatabase::new(&DatabaseUrl::Memory, 1).await?;
    Ok(Arc::new(database))
}

/// Resources over the given store and planner
pub fn build_resources(
    database: Arc<dyn DatabaseProvider>,
    llm: Arc<dyn LlmProvider>,
) -> ServerResources {
    let config = test_config();
    let auth_manager = AuthManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.jwt_expiry_minutes,
    )
    .with_bcrypt_cost(TEST_BCRYPT_COST);

    ServerResources::builder()
        .with_database(database)
        .with_llm(llm)
        .with_auth_manager(auth_manager)
        .with_config(Arc::new(config))
        .build()
        .unwrap()
}

/// Resources over a fresh in-memory store with the given planner
pub async fn create_test_resources(llm: Arc<dyn LlmProvider>) -> Result<ServerResources> {
    let database = create_test_database().await?;
    Ok(build_resources(database, llm))
}

/// Insert an active user with [`TEST_PASSWORD`]
pub async fn create_test_user(resources: &ServerResources, email: &str) -> Result<User> {
    let hash = resources.auth_manager.hash_password(TEST_PASSWORD).await?;
    let user = User::new(email.to_owned(), hash);
    resources.database.create_user(&user).await?;
    Ok(user)
}

/// Access token for `user`
pub fn bearer_token(resources: &ServerResources, user: &User) -> String {
    resources
        .auth_manager
        .generate_token(user)
        .unwrap()
        .access_token
}

/// Insert a goal directly, bypassing the planner
pub async fn create_test_goal(
    resources: &ServerResources,
    user_id: Uuid,
    goal_name: &str,
    workout_type: &str,
    calories_to_burn: i64,
) -> Result<Goal> {
    let goal = Goal::from_candidate(
        user_id,
        GoalCandidate {
            goal_name: goal_name.to_owned(),
            workout_type: workout_type.to_owned(),
            calories_to_burn,
            duration_days: 30,
            daily_target_calories: 500,
            daily_time_minutes: 45,
        },
    );
    resources.database.create_goal(&goal).await?;
    Ok(goal)
}

/// Workout input on `2025-03-{day}`
pub fn workout_input(
    workout_type: &str,
    day: u32,
    duration_minutes: i64,
    calories_burned: i64,
) -> WorkoutInput {
    WorkoutInput {
        name: format!("{workout_type} session"),
        workout_type: workout_type.to_owned(),
        date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
        duration_minutes,
        calories_burned,
        notes: None,
        goal_id: None,
    }
}
