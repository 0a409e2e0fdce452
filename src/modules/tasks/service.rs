use sqlx::PgPool;
use tracing::instrument;

use edugroup_core::AppError;
use edugroup_models::validation::trimmed_or_empty;
use edugroup_models::{ModuleId, ProjectId};

use crate::utils::access::{Actor, ensure_module_owner, ensure_module_visible, module_scope};

use super::model::{CreateTaskDto, TaskDetails, TaskId, UpdateTaskDto};

const TASK_DETAILS: &str = r#"SELECT
        t.id,
        t.title,
        t.description,
        t.due_date,
        t.status,
        t.module_id,
        m.name AS module_name,
        t.project_id,
        p.title AS project_title,
        t.assigned_by,
        a.first_name AS assigned_by_first_name,
        a.last_name AS assigned_by_last_name,
        t.created_at,
        t.updated_at
       FROM tasks t
       JOIN modules m ON m.id = t.module_id
       LEFT JOIN projects p ON p.id = t.project_id
       LEFT JOIN users a ON a.id = t.assigned_by"#;

pub struct TaskService;

impl TaskService {
    /// Visible tasks, nearest due date first; undated tasks come last.
    #[instrument(skip(db))]
    pub async fn list_tasks(db: &PgPool, actor: Actor) -> Result<Vec<TaskDetails>, AppError> {
        let sql = format!(
            "{TASK_DETAILS} WHERE {} ORDER BY t.due_date ASC NULLS LAST, t.created_at DESC",
            module_scope(&actor, "t.module_id", 1)
        );

        let tasks = sqlx::query_as::<_, TaskDetails>(&sql)
            .bind(actor.id)
            .fetch_all(db)
            .await?;

        Ok(tasks)
    }

    #[instrument(skip(db))]
    pub async fn create_task(
        db: &PgPool,
        actor: Actor,
        dto: CreateTaskDto,
    ) -> Result<TaskDetails, AppError> {
        ensure_module_owner(db, &actor, dto.module_id, "Module not found").await?;

        if let Some(project_id) = dto.project_id {
            let project_module = Self::project_module(db, project_id).await?;
            if project_module != dto.module_id {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Project does not belong to this module"
                )));
            }
        }

        let task_id = sqlx::query_scalar::<_, TaskId>(
            r#"INSERT INTO tasks (title, description, due_date, module_id, project_id, assigned_by)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(dto.title.trim())
        .bind(trimmed_or_empty(dto.description.as_deref()))
        .bind(dto.due_date)
        .bind(dto.module_id)
        .bind(dto.project_id)
        .bind(actor.id)
        .fetch_one(db)
        .await?;

        Self::get_task(db, actor, task_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_task(
        db: &PgPool,
        actor: Actor,
        task_id: TaskId,
    ) -> Result<TaskDetails, AppError> {
        let sql = format!(
            "{TASK_DETAILS} WHERE t.id = $2 AND {}",
            module_scope(&actor, "t.module_id", 1)
        );

        sqlx::query_as::<_, TaskDetails>(&sql)
            .bind(actor.id)
            .bind(task_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Task not found")))
    }

    /// Teachers owning the module may change anything; enrolled learners may
    /// only move the task through its statuses.
    #[instrument(skip(db))]
    pub async fn update_task(
        db: &PgPool,
        actor: Actor,
        task_id: TaskId,
        dto: UpdateTaskDto,
    ) -> Result<TaskDetails, AppError> {
        let module_id = Self::module_of(db, task_id).await?;

        if actor.is_teacher() {
            ensure_module_owner(db, &actor, module_id, "Task not found").await?;
        } else {
            ensure_module_visible(db, &actor, module_id, "Task not found").await?;
            if dto.touches_content() {
                return Err(AppError::forbidden(
                    "Students may only update the task status",
                ));
            }
        }

        sqlx::query(
            r#"UPDATE tasks
               SET title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   due_date = CASE WHEN $6 THEN $4 ELSE due_date END,
                   status = COALESCE($5, status),
                   updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(task_id)
        .bind(dto.title.as_deref().map(str::trim))
        .bind(dto.description.as_deref().map(str::trim))
        .bind(dto.due_date.flatten())
        .bind(dto.status)
        .bind(dto.due_date.is_some())
        .execute(db)
        .await?;

        Self::get_task(db, actor, task_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_task(db: &PgPool, actor: Actor, task_id: TaskId) -> Result<(), AppError> {
        let module_id = Self::module_of(db, task_id).await?;
        ensure_module_owner(db, &actor, module_id, "Task not found").await?;

        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(db)
            .await?;

        Ok(())
    }

    pub async fn module_of(db: &PgPool, task_id: TaskId) -> Result<ModuleId, AppError> {
        sqlx::query_scalar::<_, ModuleId>("SELECT module_id FROM tasks WHERE id = $1")
            .bind(task_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Task not found")))
    }

    async fn project_module(db: &PgPool, project_id: ProjectId) -> Result<ModuleId, AppError> {
        sqlx::query_scalar::<_, ModuleId>("SELECT module_id FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Project not found")))
    }
}
