use sqlx::PgPool;
use tracing::instrument;

use edugroup_core::AppError;

use super::model::{User, UserId, UserSummary};

const USER_COLUMNS: &str = "id, first_name, last_name, email, role, created_at, updated_at";

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn list_users(db: &PgPool) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;

        Ok(users)
    }

    /// Students and coordinators, alphabetically.
    #[instrument(skip(db))]
    pub async fn list_students(db: &PgPool) -> Result<Vec<UserSummary>, AppError> {
        let students = sqlx::query_as::<_, UserSummary>(
            r#"SELECT id, first_name, last_name, email, role
               FROM users
               WHERE role IN ('student', 'coordinator')
               ORDER BY first_name, last_name"#,
        )
        .fetch_all(db)
        .await?;

        Ok(students)
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, user_id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_user_summary(db: &PgPool, user_id: UserId) -> Result<UserSummary, AppError> {
        Ok(Self::get_user(db, user_id).await?.into())
    }
}
