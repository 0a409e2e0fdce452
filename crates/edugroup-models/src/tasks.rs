use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ModuleId, ProjectId, TaskId, UserId};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Overdue,
}

/// Task row joined with its module, optional project and assigning teacher.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TaskDetails {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub module_id: ModuleId,
    pub module_name: String,
    pub project_id: Option<ProjectId>,
    pub project_title: Option<String>,
    pub assigned_by: Option<UserId>,
    pub assigned_by_first_name: Option<String>,
    pub assigned_by_last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaskDto {
    #[validate(
        length(max = 200),
        custom(function = "crate::validation::min_two_chars_trimmed")
    )]
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub module_id: ModuleId,
    pub project_id: Option<ProjectId>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskDto {
    #[validate(
        length(max = 200),
        custom(function = "crate::validation::min_two_chars_trimmed")
    )]
    pub title: Option<String>,
    pub description: Option<String>,
    /// `null` removes the due date.
    #[serde(
        default,
        deserialize_with = "edugroup_core::serde::deserialize_nullable"
    )]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub status: Option<TaskStatus>,
}

impl UpdateTaskDto {
    /// True when anything other than `status` is being changed.
    pub fn touches_content(&self) -> bool {
        self.title.is_some() || self.description.is_some() || self.due_date.is_some()
    }
}
