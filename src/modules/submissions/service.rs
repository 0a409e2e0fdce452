use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use edugroup_core::AppError;
use edugroup_models::validation::trimmed_or_empty;
use edugroup_models::{GroupId, ModuleId, UserId};

use crate::metrics::{track_submission_created, track_submission_graded};
use crate::modules::tasks::service::TaskService;
use crate::utils::access::{
    Actor, ensure_module_owner, ensure_module_visible, is_group_member, module_scope,
};

use super::model::{
    CreateCommentDto, CreateSubmissionDto, GradeSubmissionDto, SubmissionComment,
    SubmissionDetails, SubmissionFilterParams, SubmissionId, SubmissionStatus,
};

const SUBMISSION_DETAILS: &str = r#"SELECT
        s.id,
        s.title,
        s.description,
        s.file_url,
        s.task_id,
        t.title AS task_title,
        t.module_id,
        s.submitted_by,
        u.first_name AS submitter_first_name,
        u.last_name AS submitter_last_name,
        s.group_id,
        g.name AS group_name,
        s.status,
        s.grade,
        s.feedback,
        s.submitted_at,
        s.graded_at,
        s.updated_at
       FROM submissions s
       JOIN tasks t ON t.id = s.task_id
       JOIN users u ON u.id = s.submitted_by
       LEFT JOIN student_groups g ON g.id = s.group_id"#;

const COMMENT_COLUMNS: &str = r#"c.id,
        c.submission_id,
        c.author_id,
        u.first_name AS author_first_name,
        u.last_name AS author_last_name,
        u.role AS author_role,
        c.content,
        c.created_at"#;

/// Teachers see submissions for tasks of their modules; learners see their
/// own submissions and those of their groups.
fn submission_scope(actor: &Actor, param: usize) -> String {
    if actor.is_teacher() {
        module_scope(actor, "t.module_id", param)
    } else {
        format!(
            "(s.submitted_by = ${param} OR s.group_id IN \
             (SELECT group_id FROM group_members WHERE user_id = ${param}))"
        )
    }
}

/// Blank feedback is dropped rather than stored.
fn normalize_feedback(feedback: Option<&str>) -> Option<String> {
    feedback
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
}

#[derive(FromRow)]
struct SubmissionOwnership {
    submitted_by: UserId,
    module_id: ModuleId,
    graded_at: Option<DateTime<Utc>>,
}

pub struct SubmissionService;

impl SubmissionService {
    #[instrument(skip(db))]
    pub async fn list_submissions(
        db: &PgPool,
        actor: Actor,
        filters: SubmissionFilterParams,
    ) -> Result<Vec<SubmissionDetails>, AppError> {
        let mut sql = format!("{SUBMISSION_DETAILS} WHERE {}", submission_scope(&actor, 1));
        if filters.task_id.is_some() {
            sql.push_str(" AND s.task_id = $2");
        }
        sql.push_str(" ORDER BY s.submitted_at DESC");

        let mut query = sqlx::query_as::<_, SubmissionDetails>(&sql).bind(actor.id);
        if let Some(task_id) = filters.task_id {
            query = query.bind(task_id);
        }

        let submissions = query.fetch_all(db).await?;
        Ok(submissions)
    }

    /// Records a deliverable for a task of one of the author's modules,
    /// optionally on behalf of a group the author belongs to.
    #[instrument(skip(db))]
    pub async fn create_submission(
        db: &PgPool,
        actor: Actor,
        dto: CreateSubmissionDto,
    ) -> Result<SubmissionDetails, AppError> {
        let module_id = TaskService::module_of(db, dto.task_id).await?;
        ensure_module_visible(db, &actor, module_id, "Task not found").await?;

        if !actor.is_learner() {
            return Err(AppError::forbidden("Only students can submit work"));
        }

        if let Some(group_id) = dto.group_id {
            Self::check_group(db, &actor, group_id, module_id).await?;
        }

        let submission_id = sqlx::query_scalar::<_, SubmissionId>(
            r#"INSERT INTO submissions (title, description, file_url, task_id, submitted_by, group_id)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(dto.title.trim())
        .bind(trimmed_or_empty(dto.description.as_deref()))
        .bind(dto.file_url.as_deref().map(str::trim))
        .bind(dto.task_id)
        .bind(actor.id)
        .bind(dto.group_id)
        .fetch_one(db)
        .await?;

        track_submission_created(dto.group_id.is_some());
        tracing::info!(%submission_id, task_id = %dto.task_id, "Submission created");

        Self::get_submission(db, actor, submission_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_submission(
        db: &PgPool,
        actor: Actor,
        submission_id: SubmissionId,
    ) -> Result<SubmissionDetails, AppError> {
        let sql = format!(
            "{SUBMISSION_DETAILS} WHERE s.id = $2 AND {}",
            submission_scope(&actor, 1)
        );

        sqlx::query_as::<_, SubmissionDetails>(&sql)
            .bind(actor.id)
            .bind(submission_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Submission not found")))
    }

    /// Grades a submission. Non-blank feedback is also posted as a comment
    /// from the grading teacher.
    #[instrument(skip(db))]
    pub async fn grade_submission(
        db: &PgPool,
        actor: Actor,
        submission_id: SubmissionId,
        dto: GradeSubmissionDto,
    ) -> Result<SubmissionDetails, AppError> {
        let submission = Self::ownership(db, submission_id).await?;
        ensure_module_owner(db, &actor, submission.module_id, "Submission not found").await?;

        let feedback = normalize_feedback(dto.feedback.as_deref());
        let graded_at = (dto.status != SubmissionStatus::Pending).then(Utc::now);

        let mut tx = db.begin().await?;

        sqlx::query(
            r#"UPDATE submissions
               SET status = $2,
                   grade = $3,
                   feedback = $4,
                   graded_at = $5,
                   updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(submission_id)
        .bind(dto.status)
        .bind(dto.grade)
        .bind(&feedback)
        .bind(graded_at)
        .execute(&mut *tx)
        .await?;

        if let Some(feedback) = &feedback {
            sqlx::query(
                r#"INSERT INTO submission_comments (submission_id, author_id, content)
                   VALUES ($1, $2, $3)"#,
            )
            .bind(submission_id)
            .bind(actor.id)
            .bind(feedback)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        track_submission_graded(dto.status.as_str());

        Self::get_submission(db, actor, submission_id).await
    }

    /// Authors may withdraw a submission until it has been graded.
    #[instrument(skip(db))]
    pub async fn delete_submission(
        db: &PgPool,
        actor: Actor,
        submission_id: SubmissionId,
    ) -> Result<(), AppError> {
        // Out-of-scope submissions are reported as missing.
        Self::get_submission(db, actor, submission_id).await?;
        let submission = Self::ownership(db, submission_id).await?;

        if submission.submitted_by != actor.id {
            return Err(AppError::forbidden(
                "Only the author can delete a submission",
            ));
        }
        if submission.graded_at.is_some() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Submission has already been graded"
            )));
        }

        sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(submission_id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// Review thread, oldest first.
    #[instrument(skip(db))]
    pub async fn list_comments(
        db: &PgPool,
        actor: Actor,
        submission_id: SubmissionId,
    ) -> Result<Vec<SubmissionComment>, AppError> {
        Self::get_submission(db, actor, submission_id).await?;

        let comments = sqlx::query_as::<_, SubmissionComment>(&format!(
            r#"SELECT {COMMENT_COLUMNS}
               FROM submission_comments c
               JOIN users u ON u.id = c.author_id
               WHERE c.submission_id = $1
               ORDER BY c.created_at ASC"#
        ))
        .bind(submission_id)
        .fetch_all(db)
        .await?;

        Ok(comments)
    }

    #[instrument(skip(db))]
    pub async fn add_comment(
        db: &PgPool,
        actor: Actor,
        submission_id: SubmissionId,
        dto: CreateCommentDto,
    ) -> Result<SubmissionComment, AppError> {
        Self::get_submission(db, actor, submission_id).await?;

        let comment = sqlx::query_as::<_, SubmissionComment>(&format!(
            r#"WITH c AS (
                   INSERT INTO submission_comments (submission_id, author_id, content)
                   VALUES ($1, $2, $3)
                   RETURNING *
               )
               SELECT {COMMENT_COLUMNS}
               FROM c
               JOIN users u ON u.id = c.author_id"#
        ))
        .bind(submission_id)
        .bind(actor.id)
        .bind(dto.content.trim())
        .fetch_one(db)
        .await?;

        Ok(comment)
    }

    async fn check_group(
        db: &PgPool,
        actor: &Actor,
        group_id: GroupId,
        task_module: ModuleId,
    ) -> Result<(), AppError> {
        let group_module =
            sqlx::query_scalar::<_, ModuleId>("SELECT module_id FROM student_groups WHERE id = $1")
                .bind(group_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Group not found")))?;

        if group_module != task_module {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Group does not belong to the task's module"
            )));
        }
        if !is_group_member(db, group_id, actor.id).await? {
            return Err(AppError::forbidden("You are not a member of this group"));
        }

        Ok(())
    }

    async fn ownership(
        db: &PgPool,
        submission_id: SubmissionId,
    ) -> Result<SubmissionOwnership, AppError> {
        sqlx::query_as::<_, SubmissionOwnership>(
            r#"SELECT s.submitted_by, t.module_id, s.graded_at
               FROM submissions s
               JOIN tasks t ON t.id = s.task_id
               WHERE s.id = $1"#,
        )
        .bind(submission_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Submission not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edugroup_models::UserRole;

    #[test]
    fn test_normalize_feedback() {
        assert_eq!(normalize_feedback(None), None);
        assert_eq!(normalize_feedback(Some("   ")), None);
        assert_eq!(
            normalize_feedback(Some("  Nice work ")),
            Some("Nice work".to_string())
        );
    }

    #[test]
    fn test_learner_scope_covers_own_and_group_submissions() {
        let actor = Actor {
            id: UserId::new(),
            role: UserRole::Coordinator,
        };
        let scope = submission_scope(&actor, 1);
        assert!(scope.contains("s.submitted_by = $1"));
        assert!(scope.contains("group_members WHERE user_id = $1"));
    }

    #[test]
    fn test_teacher_scope_uses_task_module() {
        let actor = Actor {
            id: UserId::new(),
            role: UserRole::Teacher,
        };
        assert_eq!(
            submission_scope(&actor, 1),
            "t.module_id IN (SELECT id FROM modules WHERE teacher_id = $1)"
        );
    }
}
