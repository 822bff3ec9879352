// ABOUTME: Extracts a structured goal from free-form goal planner output
// ABOUTME: Direct JSON parse first, then a scan over every embedded JSON object
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Goal planner responses are supposed to be a bare JSON object, but the
//! planner sometimes wraps the object in prose or code fences. Parsing runs
//! in two ordered phases:
//!
//! 1. The whole (trimmed) text is parsed as one JSON object. If that works the
//!    object is the candidate.
//! 2. Otherwise every `{` in the text is tried as the start of a JSON value,
//!    left to right. The first object that carries all six goal keys wins.
//!
//! Field constraints (positive numbers, name length) are checked afterwards by
//! [`GoalCandidate::validate`].

use fitgoal_core::constants::goal_fields;
use fitgoal_core::errors::AppError;
use fitgoal_core::models::GoalCandidate;
use serde_json::{json, Deserializer, Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Why a planner response could not be turned into a [`GoalCandidate`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalParseError {
    /// No JSON object in the text carried every required key
    #[error("no valid structured goal found in response")]
    NoStructuredGoal,
    /// A required key is absent from the selected object
    #[error("goal field `{0}` is missing")]
    MissingField(&'static str),
    /// A required key holds a value of the wrong shape
    #[error("goal field `{field}` has an invalid value: {found}")]
    InvalidField {
        /// Offending key
        field: &'static str,
        /// The value as it appeared in the response
        found: String,
    },
}

impl From<GoalParseError> for AppError {
    fn from(error: GoalParseError) -> Self {
        let details = match &error {
            GoalParseError::NoStructuredGoal => json!({ "required_fields": goal_fields::REQUIRED }),
            GoalParseError::MissingField(field) | GoalParseError::InvalidField { field, .. } => {
                json!({ "field": field })
            }
        };
        Self::unprocessable(format!("Invalid response from AI: {error}")).with_details(details)
    }
}

/// Parse a planner response into a goal candidate
///
/// # Errors
///
/// Returns [`GoalParseError`] when no usable object is found or when the
/// selected object has a missing or mistyped field. The full raw text is
/// logged at `warn` on every failure.
pub fn parse_goal(raw: &str) -> Result<GoalCandidate, GoalParseError> {
    let result = find_goal_object(raw)
        .ok_or(GoalParseError::NoStructuredGoal)
        .and_then(|object| candidate_from_object(&object));

    if let Err(error) = &result {
        warn!(raw_response = %raw, error = %error, "Failed to parse goal planner response");
    }
    result
}

/// Locate the object that should become the goal candidate
fn find_goal_object(raw: &str) -> Option<Map<String, Value>> {
    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(raw.trim()) {
        debug!("Goal planner response parsed as a single JSON object");
        return Some(object);
    }

    raw.match_indices('{').find_map(|(start, _)| {
        let object = leading_object(&raw[start..])?;
        has_required_fields(&object).then(|| {
            debug!(offset = start, "Found embedded goal object");
            object
        })
    })
}

/// Parse the JSON object that starts at the beginning of `text`, ignoring
/// whatever follows it
fn leading_object(text: &str) -> Option<Map<String, Value>> {
    match Deserializer::from_str(text).into_iter::<Value>().next() {
        Some(Ok(Value::Object(object))) => Some(object),
        _ => None,
    }
}

fn has_required_fields(object: &Map<String, Value>) -> bool {
    goal_fields::REQUIRED
        .iter()
        .all(|key| object.contains_key(*key))
}

fn candidate_from_object(object: &Map<String, Value>) -> Result<GoalCandidate, GoalParseError> {
    Ok(GoalCandidate {
        goal_name: text_field(object, goal_fields::GOAL_NAME)?,
        workout_type: text_field(object, goal_fields::WORKOUT_TYPE)?,
        calories_to_burn: integer_field(object, goal_fields::CALORIES_TO_BURN)?,
        duration_days: integer_field(object, goal_fields::DURATION_DAYS)?,
        daily_target_calories: integer_field(object, goal_fields::DAILY_TARGET_CALORIES)?,
        daily_time_minutes: integer_field(object, goal_fields::DAILY_TIME_MINUTES)?,
    })
}

fn require<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, GoalParseError> {
    object.get(field).ok_or(GoalParseError::MissingField(field))
}

fn text_field(object: &Map<String, Value>, field: &'static str) -> Result<String, GoalParseError> {
    match require(object, field)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(GoalParseError::InvalidField {
            field,
            found: other.to_string(),
        }),
    }
}

/// Integers are accepted as JSON integers, integral floats (`700.0`) or
/// numeric strings (`"700"`)
fn integer_field(object: &Map<String, Value>, field: &'static str) -> Result<i64, GoalParseError> {
    let value = require(object, field)?;
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| GoalParseError::InvalidField {
        field,
        found: value.to_string(),
    })
}
