#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use edugroup::router::init_router;
use edugroup::state::AppState;
use edugroup_auth::create_access_token;
use edugroup_config::{CorsConfig, JwtConfig, RateLimitConfig};
use edugroup_core::hash_password;
use edugroup_models::{GroupId, ModuleId, ProjectId, TaskId, UserId, UserRole};

pub const TEST_PASSWORD: &str = "password123";

pub struct TestUser {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    pub token: String,
}

pub fn setup_test_app(pool: PgPool) -> Router {
    setup_test_app_with_limits(pool, RateLimitConfig::default())
}

pub fn setup_test_app_with_limits(pool: PgPool, rate_limit_config: RateLimitConfig) -> Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config,
    };
    init_router(state)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Inserts a user with [`TEST_PASSWORD`] and mints a token for it directly,
/// so fixtures do not spend the auth rate limit.
pub async fn create_test_user(pool: &PgPool, first_name: &str, role: UserRole) -> TestUser {
    let email = generate_unique_email();
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id = sqlx::query_scalar::<_, UserId>(
        r#"INSERT INTO users (first_name, last_name, email, password, role)
           VALUES ($1, 'Tester', $2, $3, $4)
           RETURNING id"#,
    )
    .bind(first_name)
    .bind(&email)
    .bind(hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    let token = create_access_token(id.0, &email, role.as_str(), &JwtConfig::from_env()).unwrap();

    TestUser {
        id,
        email,
        role,
        token,
    }
}

pub async fn create_module(pool: &PgPool, teacher: &TestUser, name: &str) -> ModuleId {
    sqlx::query_scalar::<_, ModuleId>(
        "INSERT INTO modules (name, teacher_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(teacher.id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn enroll(pool: &PgPool, module_id: ModuleId, student: &TestUser) {
    sqlx::query("INSERT INTO module_students (module_id, student_id) VALUES ($1, $2)")
        .bind(module_id)
        .bind(student.id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_project(pool: &PgPool, module_id: ModuleId, title: &str) -> ProjectId {
    sqlx::query_scalar::<_, ProjectId>(
        r#"INSERT INTO projects (title, module_id, due_date)
           VALUES ($1, $2, NOW() + INTERVAL '14 days')
           RETURNING id"#,
    )
    .bind(title)
    .bind(module_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_task(pool: &PgPool, module_id: ModuleId, title: &str) -> TaskId {
    sqlx::query_scalar::<_, TaskId>(
        "INSERT INTO tasks (title, module_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(title)
    .bind(module_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Creates a group whose first member is its coordinator.
pub async fn create_group(
    pool: &PgPool,
    module_id: ModuleId,
    name: &str,
    members: &[&TestUser],
) -> GroupId {
    let group_id = sqlx::query_scalar::<_, GroupId>(
        r#"INSERT INTO student_groups (name, module_id, coordinator_id)
           VALUES ($1, $2, $3)
           RETURNING id"#,
    )
    .bind(name)
    .bind(module_id)
    .bind(members.first().map(|m| m.id))
    .fetch_one(pool)
    .await
    .unwrap();

    for member in members {
        sqlx::query("INSERT INTO group_members (group_id, user_id) VALUES ($1, $2)")
            .bind(group_id)
            .bind(member.id)
            .execute(pool)
            .await
            .unwrap();
    }

    group_id
}

/// Sends a request through the router and returns the status and JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
