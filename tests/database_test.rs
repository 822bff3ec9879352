// ABOUTME: Store-level tests against file-backed and in-memory SQLite databases
// ABOUTME: Schema constraints, filtered listing, summary upserts, and reopen persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{NaiveDate, Utc};
use common::{init_test_logging, workout_input};
use fitgoal_server::config::DatabaseUrl;
use fitgoal_server::database_plugins::sqlite::SqliteDatabase;
use fitgoal_server::database_plugins::DatabaseProvider;
use fitgoal_server::errors::ErrorCode;
use fitgoal_server::models::{
    Goal, GoalCandidate, OverallSummary, PersistedSummary, User, WorkoutFilter, WorkoutRecord,
};
use tempfile::TempDir;
use uuid::Uuid;

fn candidate(name: &str) -> GoalCandidate {
    GoalCandidate {
        goal_name: name.to_owned(),
        workout_type: "running".to_owned(),
        calories_to_burn: 2000,
        duration_days: 10,
        daily_target_calories: 200,
        daily_time_minutes: 30,
    }
}

async fn memory_db() -> SqliteDatabase {
    init_test_logging();
    SqliteDatabase::new(&DatabaseUrl::Memory, 1).await.unwrap()
}

#[tokio::test]
async fn test_file_database_survives_reopen() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let url = DatabaseUrl::SQLite {
        path: dir.path().join("nested").join("fitgoal.db"),
    };

    let user = User::new("persist@example.com".to_owned(), "hash".to_owned());
    {
        let db = SqliteDatabase::new(&url, 2).await.unwrap();
        db.create_user(&user).await.unwrap();
    }

    let db = SqliteDatabase::new(&url, 2).await.unwrap();
    let loaded = db.get_user_by_email("persist@example.com").await.unwrap().unwrap();
    assert_eq!(loaded.id, user.id);
    assert!(loaded.is_active);
}

#[tokio::test]
async fn test_duplicate_email_is_already_exists() {
    let db = memory_db().await;
    db.create_user(&User::new("same@example.com".to_owned(), "a".to_owned()))
        .await
        .unwrap();
    let error = db
        .create_user(&User::new("same@example.com".to_owned(), "b".to_owned()))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceAlreadyExists);
}

#[tokio::test]
async fn test_goal_name_is_unique() {
    let db = memory_db().await;
    let user = User::new("goals@example.com".to_owned(), "h".to_owned());
    db.create_user(&user).await.unwrap();

    db.create_goal(&Goal::from_candidate(user.id, candidate("Marathon")))
        .await
        .unwrap();
    let error = db
        .create_goal(&Goal::from_candidate(user.id, candidate("Marathon")))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceAlreadyExists);

    assert!(db.get_goal_by_name("Marathon").await.unwrap().is_some());
    assert!(db.get_goal_by_name("Sprint").await.unwrap().is_none());
}

#[tokio::test]
async fn test_workout_round_trip_and_filter() {
    let db = memory_db().await;
    let user = User::new("w@example.com".to_owned(), "h".to_owned());
    db.create_user(&user).await.unwrap();

    let mut input = workout_input("running", 7, 25, 250);
    input.notes = Some("tempo".to_owned());
    let workout = WorkoutRecord::from_input(user.id, input);
    db.create_workout(&workout).await.unwrap();

    let loaded = db.get_workout(user.id, workout.id).await.unwrap().unwrap();
    assert_eq!(loaded.name, workout.name);
    assert_eq!(loaded.date, workout.date);
    assert_eq!(loaded.notes.as_deref(), Some("tempo"));
    assert_eq!(loaded.goal_id, None);
    assert!(db.get_workout(Uuid::new_v4(), workout.id).await.unwrap().is_none());

    let filter = WorkoutFilter {
        goal_id: None,
        from: NaiveDate::from_ymd_opt(2025, 3, 8),
        to: None,
    };
    assert!(db.list_workouts(user.id, &filter).await.unwrap().is_empty());
    assert!(!db.delete_workout(Uuid::new_v4(), workout.id).await.unwrap());
    assert!(db.delete_workout(user.id, workout.id).await.unwrap());
}

#[tokio::test]
async fn test_summary_upsert_replaces_row() {
    let db = memory_db().await;
    let user = User::new("s@example.com".to_owned(), "h".to_owned());
    db.create_user(&user).await.unwrap();
    assert!(db.get_summary(user.id).await.unwrap().is_none());

    let mut summary = OverallSummary::empty(user.id);
    summary.total_workouts = 1;
    summary.total_calories_burned = 300;
    db.upsert_summary(&PersistedSummary {
        user_id: user.id,
        summary: summary.clone(),
        updated_at: Utc::now(),
    })
    .await
    .unwrap();

    summary.total_workouts = 2;
    summary.total_calories_burned = 550;
    db.upsert_summary(&PersistedSummary {
        user_id: user.id,
        summary: summary.clone(),
        updated_at: Utc::now(),
    })
    .await
    .unwrap();

    let stored = db.get_summary(user.id).await.unwrap().unwrap();
    assert_eq!(stored.summary, summary);
}
