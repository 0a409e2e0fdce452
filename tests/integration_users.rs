mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

use common::{create_test_user, send, setup_test_app};
use edugroup_models::{UserId, UserRole};

#[sqlx::test(migrations = "./migrations")]
async fn test_list_users_is_teacher_only(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tina", UserRole::Teacher).await;
    let student = create_test_user(&pool, "Sam", UserRole::Student).await;
    let app = setup_test_app(pool);

    let (status, body) = send(&app, "GET", "/api/users", Some(&teacher.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, "GET", "/api/users", Some(&student.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_students_includes_coordinators_only(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tina", UserRole::Teacher).await;
    create_test_user(&pool, "Bob", UserRole::Student).await;
    create_test_user(&pool, "Ann", UserRole::Coordinator).await;
    let app = setup_test_app(pool);

    let (status, body) = send(&app, "GET", "/api/users/students", Some(&teacher.token), None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["first_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ann", "Bob"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_user_by_id(pool: PgPool) {
    let viewer = create_test_user(&pool, "Viewer", UserRole::Student).await;
    let other = create_test_user(&pool, "Other", UserRole::Teacher).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/users/{}", other.id),
        Some(&viewer.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "teacher");

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/users/{}", UserId::new()),
        Some(&viewer.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
