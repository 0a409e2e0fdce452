//! Visibility scoping shared by the feature services.
//!
//! Learners (students and coordinators) see what belongs to the modules they
//! are enrolled in; teachers see what belongs to the modules they own.
//! Anything outside that scope is reported as "not found".

use sqlx::PgPool;

use edugroup_core::AppError;
use edugroup_models::{GroupId, ModuleId, UserId, UserRole};

/// The authenticated caller, as far as visibility rules are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: UserRole,
}

impl Actor {
    pub fn is_teacher(&self) -> bool {
        self.role == UserRole::Teacher
    }

    pub fn is_learner(&self) -> bool {
        self.role.is_learner()
    }
}

/// SQL predicate restricting `module_column` to the actor's modules.
/// The actor's id must be bound at position `$param`.
pub fn module_scope(actor: &Actor, module_column: &str, param: usize) -> String {
    if actor.is_teacher() {
        format!("{module_column} IN (SELECT id FROM modules WHERE teacher_id = ${param})")
    } else {
        format!(
            "{module_column} IN (SELECT module_id FROM module_students WHERE student_id = ${param})"
        )
    }
}

pub async fn is_enrolled(
    db: &PgPool,
    module_id: ModuleId,
    user_id: UserId,
) -> Result<bool, AppError> {
    let enrolled = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM module_students WHERE module_id = $1 AND student_id = $2)",
    )
    .bind(module_id)
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(enrolled)
}

pub async fn is_group_member(
    db: &PgPool,
    group_id: GroupId,
    user_id: UserId,
) -> Result<bool, AppError> {
    let member = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM group_members WHERE group_id = $1 AND user_id = $2)",
    )
    .bind(group_id)
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(member)
}

pub async fn module_owner(db: &PgPool, module_id: ModuleId) -> Result<Option<UserId>, AppError> {
    let owner = sqlx::query_scalar::<_, UserId>("SELECT teacher_id FROM modules WHERE id = $1")
        .bind(module_id)
        .fetch_optional(db)
        .await?;
    Ok(owner)
}

/// Succeeds only for the teacher who owns the module.
///
/// Enrolled learners get 403; everyone else gets 404 with `missing` as the
/// message because the resource is outside their scope.
pub async fn ensure_module_owner(
    db: &PgPool,
    actor: &Actor,
    module_id: ModuleId,
    missing: &'static str,
) -> Result<(), AppError> {
    let not_found = || AppError::not_found(anyhow::anyhow!(missing));

    let owner = module_owner(db, module_id).await?.ok_or_else(not_found)?;
    if owner == actor.id {
        return Ok(());
    }

    if actor.is_learner() && is_enrolled(db, module_id, actor.id).await? {
        return Err(AppError::forbidden(
            "Only the module's teacher can perform this action",
        ));
    }

    Err(not_found())
}

/// Succeeds when the module is in the actor's scope.
pub async fn ensure_module_visible(
    db: &PgPool,
    actor: &Actor,
    module_id: ModuleId,
    missing: &'static str,
) -> Result<(), AppError> {
    let visible = if actor.is_teacher() {
        module_owner(db, module_id).await? == Some(actor.id)
    } else {
        is_enrolled(db, module_id, actor.id).await?
    };

    if visible {
        Ok(())
    } else {
        Err(AppError::not_found(anyhow::anyhow!(missing)))
    }
}

/// Maps a unique-constraint violation to 400 with `message`; anything else
/// stays a server error.
pub fn unique_violation_as_bad_request(err: sqlx::Error, message: &'static str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return AppError::bad_request(anyhow::anyhow!(message));
    }
    AppError::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teacher_scope_uses_ownership() {
        let actor = Actor {
            id: UserId::new(),
            role: UserRole::Teacher,
        };
        assert_eq!(
            module_scope(&actor, "p.module_id", 1),
            "p.module_id IN (SELECT id FROM modules WHERE teacher_id = $1)"
        );
    }

    #[test]
    fn test_learner_scope_uses_enrolment() {
        for role in [UserRole::Student, UserRole::Coordinator] {
            let actor = Actor {
                id: UserId::new(),
                role,
            };
            assert_eq!(
                module_scope(&actor, "m.id", 2),
                "m.id IN (SELECT module_id FROM module_students WHERE student_id = $2)"
            );
        }
    }
}
