// ABOUTME: Instruction template sent to the goal planner
// ABOUTME: Asks for a bare JSON object with the six structured goal fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{ChatMessage, ChatRequest};

/// Sampling temperature for goal planning
pub const GOAL_PLANNER_TEMPERATURE: f32 = 0.2;

/// Reply length cap for goal planning
pub const GOAL_PLANNER_MAX_TOKENS: u32 = 512;

/// Fixed instruction that precedes every goal description
pub const GOAL_PLANNER_INSTRUCTION: &str = r#"You are a fitness goal planner assistant.
Based on the user's goal description below, return a JSON object with a detailed breakdown of their workout target.
Use this format:
  "goal_name": "string",
  "workout_type": "string",
  "calories_to_burn": integer,
  "duration_days": integer,
  "daily_target_calories": integer,
  "daily_time_minutes": integer,

Use these rules:
- 1 kg of fat = 7700 kcal
- Estimate calorie burn rate based on the activity (e.g., Running ≈ 10 kcal/min, Walking ≈ 4 kcal/min, Cycling ≈ 8 kcal/min)
- Assume 5 workout days per week unless specified otherwise
- Only return the JSON object, no explanation"#;

/// Build the single user message for a goal description
#[must_use]
pub fn goal_planner_prompt(goal_description: &str) -> String {
    format!("{GOAL_PLANNER_INSTRUCTION} \n{} ", goal_description.trim())
}

/// Completion request for a goal description
#[must_use]
pub fn goal_planner_request(goal_description: &str) -> ChatRequest {
    ChatRequest::new(vec![ChatMessage::user(goal_planner_prompt(goal_description))])
        .with_temperature(GOAL_PLANNER_TEMPERATURE)
        .with_max_tokens(GOAL_PLANNER_MAX_TOKENS)
}
