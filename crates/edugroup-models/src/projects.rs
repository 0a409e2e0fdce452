//! Project models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ModuleId, ProjectId, StepId, UserId};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "project_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Draft,
    #[default]
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub module_id: ModuleId,
    pub due_date: DateTime<Utc>,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project row joined with its module and the module's teacher.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProjectListItem {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub module_id: ModuleId,
    pub module_name: String,
    pub teacher_id: UserId,
    pub teacher_first_name: String,
    pub teacher_last_name: String,
    pub due_date: DateTime<Utc>,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProjectStep {
    pub id: StepId,
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    /// 1-based position within the project.
    pub step_order: i32,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProjectWithSteps {
    #[serde(flatten)]
    pub project: ProjectListItem,
    pub steps: Vec<ProjectStep>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateStepDto {
    #[validate(length(max = 200), custom(function = "crate::validation::non_blank"))]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProjectDto {
    #[validate(
        length(max = 200),
        custom(function = "crate::validation::min_two_chars_trimmed")
    )]
    #[schema(example = "Build a key-value store")]
    pub title: String,
    pub description: Option<String>,
    pub module_id: ModuleId,
    pub due_date: DateTime<Utc>,
    /// Steps are numbered in the order given.
    #[validate(length(min = 1, message = "At least one step is required"), nested)]
    pub steps: Vec<CreateStepDto>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProjectDto {
    #[validate(
        length(max = 200),
        custom(function = "crate::validation::min_two_chars_trimmed")
    )]
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<ProjectStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(title: &str) -> CreateStepDto {
        CreateStepDto {
            title: title.to_string(),
            description: None,
        }
    }

    fn project(steps: Vec<CreateStepDto>) -> CreateProjectDto {
        CreateProjectDto {
            title: "Compiler".to_string(),
            description: None,
            module_id: ModuleId::new(),
            due_date: Utc::now(),
            steps,
        }
    }

    #[test]
    fn test_create_project_requires_steps() {
        assert!(project(vec![step("Lexer")]).validate().is_ok());
        assert!(project(vec![]).validate().is_err());
    }

    #[test]
    fn test_create_project_validates_nested_steps() {
        let dto = project(vec![step("Lexer"), step("   ")]);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_project_status_serde() {
        let status: ProjectStatus = serde_json::from_str(r#""completed""#).unwrap();
        assert_eq!(status, ProjectStatus::Completed);
        assert!(serde_json::from_str::<ProjectStatus>(r#""archived""#).is_err());
        assert_eq!(ProjectStatus::default(), ProjectStatus::Active);
    }

    #[test]
    fn test_update_project_dto() {
        let dto: UpdateProjectDto = serde_json::from_str(r#"{"status":"draft"}"#).unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.status, Some(ProjectStatus::Draft));
        assert!(dto.title.is_none());
    }
}
