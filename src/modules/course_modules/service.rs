use sqlx::PgPool;
use tracing::instrument;

use edugroup_core::AppError;
use edugroup_models::{UserRole, UserSummary};
use edugroup_models::validation::trimmed_or_empty;

use crate::utils::access::{Actor, ensure_module_owner, ensure_module_visible, module_scope};

use super::model::{
    CourseModule, CreateModuleDto, ModuleDetail, ModuleId, ModuleWithStats, UpdateModuleDto,
    UserId,
};

const MODULE_WITH_STATS: &str = r#"SELECT
        m.id,
        m.name,
        m.description,
        m.teacher_id,
        u.first_name AS teacher_first_name,
        u.last_name AS teacher_last_name,
        (SELECT COUNT(*) FROM module_students ms WHERE ms.module_id = m.id) AS student_count,
        (SELECT COUNT(*) FROM projects p WHERE p.module_id = m.id) AS project_count,
        m.created_at,
        m.updated_at
       FROM modules m
       JOIN users u ON u.id = m.teacher_id"#;

const MODULE_COLUMNS: &str = "id, name, description, teacher_id, created_at, updated_at";

pub struct CourseModuleService;

impl CourseModuleService {
    #[instrument(skip(db))]
    pub async fn list_modules(db: &PgPool, actor: Actor) -> Result<Vec<ModuleWithStats>, AppError> {
        let sql = format!(
            "{MODULE_WITH_STATS} WHERE {} ORDER BY m.created_at DESC",
            module_scope(&actor, "m.id", 1)
        );

        let modules = sqlx::query_as::<_, ModuleWithStats>(&sql)
            .bind(actor.id)
            .fetch_all(db)
            .await?;

        Ok(modules)
    }

    #[instrument(skip(db))]
    pub async fn create_module(
        db: &PgPool,
        teacher_id: UserId,
        dto: CreateModuleDto,
    ) -> Result<CourseModule, AppError> {
        let module = sqlx::query_as::<_, CourseModule>(&format!(
            r#"INSERT INTO modules (name, description, teacher_id)
               VALUES ($1, $2, $3)
               RETURNING {MODULE_COLUMNS}"#
        ))
        .bind(dto.name.trim())
        .bind(trimmed_or_empty(dto.description.as_deref()))
        .bind(teacher_id)
        .fetch_one(db)
        .await?;

        Ok(module)
    }

    #[instrument(skip(db))]
    pub async fn get_module(
        db: &PgPool,
        actor: Actor,
        module_id: ModuleId,
    ) -> Result<ModuleDetail, AppError> {
        ensure_module_visible(db, &actor, module_id, "Module not found").await?;

        let module = sqlx::query_as::<_, ModuleWithStats>(&format!(
            "{MODULE_WITH_STATS} WHERE m.id = $1"
        ))
        .bind(module_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Module not found")))?;

        let students = Self::enrolled_students(db, module_id).await?;

        Ok(ModuleDetail { module, students })
    }

    pub async fn enrolled_students(
        db: &PgPool,
        module_id: ModuleId,
    ) -> Result<Vec<UserSummary>, AppError> {
        let students = sqlx::query_as::<_, UserSummary>(
            r#"SELECT u.id, u.first_name, u.last_name, u.email, u.role
               FROM module_students ms
               JOIN users u ON u.id = ms.student_id
               WHERE ms.module_id = $1
               ORDER BY u.first_name, u.last_name"#,
        )
        .bind(module_id)
        .fetch_all(db)
        .await?;

        Ok(students)
    }

    #[instrument(skip(db))]
    pub async fn update_module(
        db: &PgPool,
        actor: Actor,
        module_id: ModuleId,
        dto: UpdateModuleDto,
    ) -> Result<CourseModule, AppError> {
        ensure_module_owner(db, &actor, module_id, "Module not found").await?;

        let module = sqlx::query_as::<_, CourseModule>(&format!(
            r#"UPDATE modules
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {MODULE_COLUMNS}"#
        ))
        .bind(module_id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.description.as_deref().map(str::trim))
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Module not found")))?;

        Ok(module)
    }

    /// Deletes the module; projects, tasks, groups and enrolments go with it.
    #[instrument(skip(db))]
    pub async fn delete_module(
        db: &PgPool,
        actor: Actor,
        module_id: ModuleId,
    ) -> Result<(), AppError> {
        ensure_module_owner(db, &actor, module_id, "Module not found").await?;

        sqlx::query("DELETE FROM modules WHERE id = $1")
            .bind(module_id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// Enrols a learner. Enrolling someone twice is a no-op.
    #[instrument(skip(db))]
    pub async fn enroll_student(
        db: &PgPool,
        actor: Actor,
        module_id: ModuleId,
        student_id: UserId,
    ) -> Result<ModuleDetail, AppError> {
        ensure_module_owner(db, &actor, module_id, "Module not found").await?;

        let role = sqlx::query_scalar::<_, UserRole>("SELECT role FROM users WHERE id = $1")
            .bind(student_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;
        if !role.is_learner() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Only students and coordinators can be enrolled"
            )));
        }

        sqlx::query(
            r#"INSERT INTO module_students (module_id, student_id)
               VALUES ($1, $2)
               ON CONFLICT (module_id, student_id) DO NOTHING"#,
        )
        .bind(module_id)
        .bind(student_id)
        .execute(db)
        .await?;

        Self::get_module(db, actor, module_id).await
    }

    /// Removes a learner from the module and from every group of it. Groups
    /// they coordinated pass to their longest-standing remaining member.
    #[instrument(skip(db))]
    pub async fn unenroll_student(
        db: &PgPool,
        actor: Actor,
        module_id: ModuleId,
        student_id: UserId,
    ) -> Result<(), AppError> {
        ensure_module_owner(db, &actor, module_id, "Module not found").await?;

        let mut tx = db.begin().await?;

        let result =
            sqlx::query("DELETE FROM module_students WHERE module_id = $1 AND student_id = $2")
                .bind(module_id)
                .bind(student_id)
                .execute(&mut *tx)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Student is not enrolled in this module"
            )));
        }

        sqlx::query(
            r#"DELETE FROM group_members gm
               USING student_groups g
               WHERE g.id = gm.group_id AND g.module_id = $1 AND gm.user_id = $2"#,
        )
        .bind(module_id)
        .bind(student_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"UPDATE student_groups g
               SET coordinator_id = (
                       SELECT gm.user_id FROM group_members gm
                       WHERE gm.group_id = g.id
                       ORDER BY gm.joined_at, gm.user_id
                       LIMIT 1
                   ),
                   updated_at = NOW()
               WHERE g.module_id = $1 AND g.coordinator_id = $2"#,
        )
        .bind(module_id)
        .bind(student_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }
}
