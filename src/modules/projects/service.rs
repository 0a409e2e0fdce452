use std::collections::HashMap;

use sqlx::PgPool;
use tracing::instrument;

use edugroup_core::AppError;
use edugroup_models::ModuleId;
use edugroup_models::validation::trimmed_or_empty;

use crate::utils::access::{Actor, ensure_module_owner, module_scope};

use super::model::{
    CreateProjectDto, ProjectId, ProjectListItem, ProjectStep, ProjectWithSteps, UpdateProjectDto,
};

const PROJECT_LIST_ITEM: &str = r#"SELECT
        p.id,
        p.title,
        p.description,
        p.module_id,
        m.name AS module_name,
        m.teacher_id,
        u.first_name AS teacher_first_name,
        u.last_name AS teacher_last_name,
        p.due_date,
        p.status,
        p.created_at,
        p.updated_at
       FROM projects p
       JOIN modules m ON m.id = p.module_id
       JOIN users u ON u.id = m.teacher_id"#;

const STEP_COLUMNS: &str =
    "id, project_id, title, description, step_order, is_completed, created_at";

pub struct ProjectService;

impl ProjectService {
    #[instrument(skip(db))]
    pub async fn list_projects(
        db: &PgPool,
        actor: Actor,
    ) -> Result<Vec<ProjectWithSteps>, AppError> {
        let sql = format!(
            "{PROJECT_LIST_ITEM} WHERE {} ORDER BY p.created_at DESC",
            module_scope(&actor, "p.module_id", 1)
        );

        let projects = sqlx::query_as::<_, ProjectListItem>(&sql)
            .bind(actor.id)
            .fetch_all(db)
            .await?;

        let ids: Vec<ProjectId> = projects.iter().map(|p| p.id).collect();
        let mut steps = Self::steps_by_project(db, &ids).await?;

        Ok(projects
            .into_iter()
            .map(|project| ProjectWithSteps {
                steps: steps.remove(&project.id).unwrap_or_default(),
                project,
            })
            .collect())
    }

    /// Creates the project and its steps atomically. Steps are numbered
    /// 1..n in the order they were submitted.
    #[instrument(skip(db))]
    pub async fn create_project(
        db: &PgPool,
        actor: Actor,
        dto: CreateProjectDto,
    ) -> Result<ProjectWithSteps, AppError> {
        ensure_module_owner(db, &actor, dto.module_id, "Module not found").await?;

        let mut tx = db.begin().await?;

        let project_id = sqlx::query_scalar::<_, ProjectId>(
            r#"INSERT INTO projects (title, description, module_id, due_date)
               VALUES ($1, $2, $3, $4)
               RETURNING id"#,
        )
        .bind(dto.title.trim())
        .bind(trimmed_or_empty(dto.description.as_deref()))
        .bind(dto.module_id)
        .bind(dto.due_date)
        .fetch_one(&mut *tx)
        .await?;

        for (index, step) in dto.steps.iter().enumerate() {
            sqlx::query(
                r#"INSERT INTO project_steps (project_id, title, description, step_order)
                   VALUES ($1, $2, $3, $4)"#,
            )
            .bind(project_id)
            .bind(step.title.trim())
            .bind(trimmed_or_empty(step.description.as_deref()))
            .bind(index as i32 + 1)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(%project_id, steps = dto.steps.len(), "Project created");

        Self::get_project(db, actor, project_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_project(
        db: &PgPool,
        actor: Actor,
        project_id: ProjectId,
    ) -> Result<ProjectWithSteps, AppError> {
        let sql = format!(
            "{PROJECT_LIST_ITEM} WHERE p.id = $2 AND {}",
            module_scope(&actor, "p.module_id", 1)
        );

        let project = sqlx::query_as::<_, ProjectListItem>(&sql)
            .bind(actor.id)
            .bind(project_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Project not found")))?;

        let steps = sqlx::query_as::<_, ProjectStep>(&format!(
            "SELECT {STEP_COLUMNS} FROM project_steps WHERE project_id = $1 ORDER BY step_order"
        ))
        .bind(project_id)
        .fetch_all(db)
        .await?;

        Ok(ProjectWithSteps { project, steps })
    }

    #[instrument(skip(db))]
    pub async fn update_project(
        db: &PgPool,
        actor: Actor,
        project_id: ProjectId,
        dto: UpdateProjectDto,
    ) -> Result<ProjectWithSteps, AppError> {
        let module_id = Self::module_of(db, project_id).await?;
        ensure_module_owner(db, &actor, module_id, "Project not found").await?;

        sqlx::query(
            r#"UPDATE projects
               SET title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   due_date = COALESCE($4, due_date),
                   status = COALESCE($5, status),
                   updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(project_id)
        .bind(dto.title.as_deref().map(str::trim))
        .bind(dto.description.as_deref().map(str::trim))
        .bind(dto.due_date)
        .bind(dto.status)
        .execute(db)
        .await?;

        Self::get_project(db, actor, project_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_project(
        db: &PgPool,
        actor: Actor,
        project_id: ProjectId,
    ) -> Result<(), AppError> {
        let module_id = Self::module_of(db, project_id).await?;
        ensure_module_owner(db, &actor, module_id, "Project not found").await?;

        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(project_id)
            .execute(db)
            .await?;

        Ok(())
    }

    async fn module_of(db: &PgPool, project_id: ProjectId) -> Result<ModuleId, AppError> {
        sqlx::query_scalar::<_, ModuleId>("SELECT module_id FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Project not found")))
    }

    async fn steps_by_project(
        db: &PgPool,
        project_ids: &[ProjectId],
    ) -> Result<HashMap<ProjectId, Vec<ProjectStep>>, AppError> {
        if project_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let steps = sqlx::query_as::<_, ProjectStep>(&format!(
            r#"SELECT {STEP_COLUMNS} FROM project_steps
               WHERE project_id = ANY($1)
               ORDER BY project_id, step_order"#
        ))
        .bind(project_ids)
        .fetch_all(db)
        .await?;

        Ok(group_steps(steps))
    }
}

/// Buckets steps by project, preserving their order.
fn group_steps(steps: Vec<ProjectStep>) -> HashMap<ProjectId, Vec<ProjectStep>> {
    let mut grouped: HashMap<ProjectId, Vec<ProjectStep>> = HashMap::new();
    for step in steps {
        grouped.entry(step.project_id).or_default().push(step);
    }
    grouped
}
