//! Programming problem models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use elysia_core::pagination::{PaginationMeta, PaginationParams, deserialize_optional_i64};

use crate::validators::validate_slug;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "problem_difficulty", rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Problem {
    pub id: i64,
    pub title: String,
    pub title_slug: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub description: String,
    pub explanation: Option<String>,
    pub hint: Option<String>,
    pub constraints: Option<String>,
    pub advanced_requirement: Option<String>,
    #[schema(value_type = Object)]
    pub test_cases: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Test cases must be a non-empty JSON array or object.
fn validate_test_cases(value: &serde_json::Value) -> Result<(), ValidationError> {
    let ok = match value {
        serde_json::Value::Array(items) => !items.is_empty(),
        serde_json::Value::Object(map) => !map.is_empty(),
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("test_cases"))
    }
}

#[derive(Deserialize, Debug, Clone, ToSchema, Validate)]
pub struct CreateProblemRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200), custom(function = "validate_slug"))]
    pub title_slug: String,
    pub difficulty: Option<Difficulty>,
    #[validate(length(max = 20))]
    pub tags: Option<Vec<String>>,
    #[validate(length(min = 1))]
    pub description: String,
    pub explanation: Option<String>,
    pub hint: Option<String>,
    pub constraints: Option<String>,
    pub advanced_requirement: Option<String>,
    #[schema(value_type = Object)]
    #[validate(custom(function = "validate_test_cases"))]
    pub test_cases: serde_json::Value,
}

#[derive(Deserialize, Debug, Default, Clone, ToSchema, Validate)]
pub struct UpdateProblemRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200), custom(function = "validate_slug"))]
    pub title_slug: Option<String>,
    pub difficulty: Option<Difficulty>,
    #[validate(length(max = 20))]
    pub tags: Option<Vec<String>>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub explanation: Option<String>,
    pub hint: Option<String>,
    pub constraints: Option<String>,
    pub advanced_requirement: Option<String>,
    #[schema(value_type = Option<Object>)]
    #[validate(custom(function = "validate_test_cases"))]
    pub test_cases: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug, Default, Clone, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProblemQueryParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page_size: Option<i64>,
    pub difficulty: Option<Difficulty>,
    /// Problems carrying this tag
    pub tag: Option<String>,
}

impl ProblemQueryParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PaginatedProblemsResponse {
    pub data: Vec<Problem>,
    pub meta: PaginationMeta,
}
