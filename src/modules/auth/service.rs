use sqlx::PgPool;
use tracing::instrument;

use edugroup_auth::create_access_token;
use edugroup_config::JwtConfig;
use edugroup_core::{AppError, hash_password, verify_password};
use edugroup_models::User;

use crate::metrics::{track_jwt_issued, track_login_failure, track_login_success};
use crate::utils::access::unique_violation_as_bad_request;

use super::model::{AuthResponse, LoginRequest, RegisterRequest};

#[derive(sqlx::FromRow)]
struct UserWithPassword {
    #[sqlx(flatten)]
    user: User,
    password: String,
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto), fields(email = %dto.email, role = %dto.role))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequest) -> Result<User, AppError> {
        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (first_name, last_name, email, password, role)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, first_name, last_name, email, role, created_at, updated_at"#,
        )
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(normalize_email(&dto.email))
        .bind(&hashed_password)
        .bind(dto.role)
        .fetch_one(db)
        .await
        .map_err(|e| unique_violation_as_bad_request(e, "Email already exists"))?;

        Ok(user)
    }

    /// Checks the credentials and issues an access token.
    ///
    /// Unknown emails and wrong passwords produce the same 401 so callers
    /// cannot probe which accounts exist.
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let invalid = || AppError::unauthorized("Invalid email or password");

        let Some(row) = sqlx::query_as::<_, UserWithPassword>(
            r#"SELECT id, first_name, last_name, email, role, created_at, updated_at, password
               FROM users WHERE email = $1"#,
        )
        .bind(normalize_email(&dto.email))
        .fetch_optional(db)
        .await?
        else {
            track_login_failure("unknown_email");
            return Err(invalid());
        };

        if !verify_password(&dto.password, &row.password)? {
            track_login_failure("invalid_password");
            return Err(invalid());
        }

        let access_token = Self::issue_token(&row.user, jwt_config)?;
        track_login_success(row.user.role.as_str());

        Ok(AuthResponse::bearer(access_token, row.user))
    }

    pub fn issue_token(user: &User, jwt_config: &JwtConfig) -> Result<String, AppError> {
        let token = create_access_token(
            user.id.into_inner(),
            &user.email,
            user.role.as_str(),
            jwt_config,
        )?;
        track_jwt_issued();
        Ok(token)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
