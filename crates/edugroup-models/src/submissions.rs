//! Submission models, grading and review comments.

use chrono::{DateTime, Utc};
use edugroup_core::serde::deserialize_optional_uuid;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::ids::{CommentId, GroupId, ModuleId, SubmissionId, TaskId, UserId};
use crate::users::UserRole;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "submission_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Graded,
    ReturnedForRevision,
}

impl SubmissionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Graded => "graded",
            Self::ReturnedForRevision => "returned_for_revision",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SubmissionDetails {
    pub id: SubmissionId,
    pub title: String,
    pub description: String,
    pub file_url: Option<String>,
    pub task_id: TaskId,
    pub task_title: String,
    pub module_id: ModuleId,
    pub submitted_by: UserId,
    pub submitter_first_name: String,
    pub submitter_last_name: String,
    pub group_id: Option<GroupId>,
    pub group_name: Option<String>,
    pub status: SubmissionStatus,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub graded_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSubmissionDto {
    #[validate(
        length(max = 200),
        custom(function = "crate::validation::min_two_chars_trimmed")
    )]
    pub title: String,
    pub description: Option<String>,
    #[validate(url(message = "file_url must be a valid URL"))]
    pub file_url: Option<String>,
    pub task_id: TaskId,
    pub group_id: Option<GroupId>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GradeSubmissionDto {
    pub status: SubmissionStatus,
    #[validate(range(min = 0.0, max = 20.0, message = "Grade must be between 0 and 20"))]
    #[schema(example = 15.5)]
    pub grade: Option<f64>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SubmissionComment {
    pub id: CommentId,
    pub submission_id: SubmissionId,
    pub author_id: UserId,
    pub author_first_name: String,
    pub author_last_name: String,
    pub author_role: UserRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentDto {
    #[validate(
        length(min = 1, message = "Comment cannot be empty"),
        custom(function = "crate::validation::non_blank")
    )]
    pub content: String,
}

/// Query string of `GET /submissions`. An empty `task_id` means no filter.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct SubmissionFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub task_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_range() {
        let grade = |g: f64| GradeSubmissionDto {
            status: SubmissionStatus::Graded,
            grade: Some(g),
            feedback: None,
        };
        assert!(grade(0.0).validate().is_ok());
        assert!(grade(20.0).validate().is_ok());
        assert!(grade(20.5).validate().is_err());
        assert!(grade(-1.0).validate().is_err());
    }

    #[test]
    fn test_grade_is_optional() {
        let dto: GradeSubmissionDto =
            serde_json::from_str(r#"{"status":"returned_for_revision"}"#).unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.status, SubmissionStatus::ReturnedForRevision);
        assert!(dto.grade.is_none());
    }

    #[test]
    fn test_create_submission_rejects_bad_url() {
        let dto = CreateSubmissionDto {
            title: "Final report".to_string(),
            description: None,
            file_url: Some("not a url".to_string()),
            task_id: TaskId::new(),
            group_id: None,
        };
        assert!(dto.validate().is_err());

        let ok = CreateSubmissionDto {
            file_url: Some("https://files.example.com/report.pdf".to_string()),
            ..dto
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_comment_must_not_be_blank() {
        let blank = CreateCommentDto {
            content: "  ".to_string(),
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_filter_params_empty_task_id() {
        let params: SubmissionFilterParams = serde_json::from_str(r#"{"task_id":""}"#).unwrap();
        assert!(params.task_id.is_none());
    }
}
