//! Course module models and DTOs.
//!
//! A course module is owned by one teacher and enrols students; projects,
//! tasks and groups all hang off a module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ModuleId, UserId};
use crate::users::UserSummary;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CourseModule {
    pub id: ModuleId,
    pub name: String,
    pub description: String,
    pub teacher_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List row: the module plus its owner's name and aggregate counts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ModuleWithStats {
    pub id: ModuleId,
    pub name: String,
    pub description: String,
    pub teacher_id: UserId,
    pub teacher_first_name: String,
    pub teacher_last_name: String,
    pub student_count: i64,
    pub project_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModuleDetail {
    #[serde(flatten)]
    pub module: ModuleWithStats,
    pub students: Vec<UserSummary>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateModuleDto {
    #[validate(
        length(max = 200),
        custom(function = "crate::validation::min_two_chars_trimmed")
    )]
    #[schema(example = "Distributed Systems")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateModuleDto {
    #[validate(
        length(max = 200),
        custom(function = "crate::validation::min_two_chars_trimmed")
    )]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EnrollStudentDto {
    pub student_id: UserId,
}
