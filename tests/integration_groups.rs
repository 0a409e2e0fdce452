mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{create_group, create_module, create_test_user, enroll, send, setup_test_app};
use edugroup_models::UserRole;

#[sqlx::test(migrations = "./migrations")]
async fn test_student_creates_group_and_coordinates(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tina", UserRole::Teacher).await;
    let sam = create_test_user(&pool, "Sam", UserRole::Student).await;
    let ana = create_test_user(&pool, "Ana", UserRole::Student).await;

    let module_id = create_module(&pool, &teacher, "Algorithms").await;
    enroll(&pool, module_id, &sam).await;
    enroll(&pool, module_id, &ana).await;

    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/groups",
        Some(&sam.token),
        Some(json!({
            "name": "Team Graph",
            "module_id": module_id,
            "member_ids": [ana.id, ana.id]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["coordinator_id"], sam.id.to_string());
    assert_eq!(body["member_count"], 2);
    assert_eq!(body["members"].as_array().unwrap().len(), 2);

    // The teacher sees the group through the module.
    let (_, body) = send(&app, "GET", "/api/groups", Some(&teacher.token), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_group_members_must_be_enrolled(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tina", UserRole::Teacher).await;
    let sam = create_test_user(&pool, "Sam", UserRole::Student).await;
    let olly = create_test_user(&pool, "Olly", UserRole::Student).await;

    let module_id = create_module(&pool, &teacher, "Algorithms").await;
    enroll(&pool, module_id, &sam).await;

    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/groups",
        Some(&sam.token),
        Some(json!({ "name": "Team", "module_id": module_id, "member_ids": [olly.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/groups",
        Some(&olly.token),
        Some(json!({ "name": "Team", "module_id": module_id, "member_ids": [sam.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_creates_group_first_member_coordinates(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tina", UserRole::Teacher).await;
    let sam = create_test_user(&pool, "Sam", UserRole::Student).await;
    let ana = create_test_user(&pool, "Ana", UserRole::Student).await;

    let module_id = create_module(&pool, &teacher, "Algorithms").await;
    enroll(&pool, module_id, &sam).await;
    enroll(&pool, module_id, &ana).await;

    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/groups",
        Some(&teacher.token),
        Some(json!({ "name": "Team", "module_id": module_id, "member_ids": [ana.id, sam.id] })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["coordinator_id"], ana.id.to_string());
    assert_eq!(body["member_count"], 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_group_visibility(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tina", UserRole::Teacher).await;
    let sam = create_test_user(&pool, "Sam", UserRole::Student).await;
    let ana = create_test_user(&pool, "Ana", UserRole::Student).await;

    let module_id = create_module(&pool, &teacher, "Algorithms").await;
    enroll(&pool, module_id, &sam).await;
    enroll(&pool, module_id, &ana).await;
    let group_id = create_group(&pool, module_id, "Team", &[&sam]).await;

    let app = setup_test_app(pool);
    let uri = format!("/api/groups/{}", group_id);

    let (status, _) = send(&app, "GET", &uri, Some(&sam.token), None).await;
    assert_eq!(status, StatusCode::OK);

    // Same module, different group.
    let (status, _) = send(&app, "GET", &uri, Some(&ana.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "GET",
        &format!("{}/members", uri),
        Some(&teacher.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], sam.id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_membership_management(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tina", UserRole::Teacher).await;
    let sam = create_test_user(&pool, "Sam", UserRole::Student).await;
    let ana = create_test_user(&pool, "Ana", UserRole::Student).await;
    let olly = create_test_user(&pool, "Olly", UserRole::Student).await;

    let module_id = create_module(&pool, &teacher, "Algorithms").await;
    enroll(&pool, module_id, &sam).await;
    enroll(&pool, module_id, &ana).await;
    let group_id = create_group(&pool, module_id, "Team", &[&sam]).await;

    let app = setup_test_app(pool);
    let uri = format!("/api/groups/{}/membership", group_id);

    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(&sam.token),
        Some(json!({ "user_id": ana.id, "action": "add" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member_count"], 2);

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(&sam.token),
        Some(json!({ "user_id": olly.id, "action": "add" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A plain member may not manage the group.
    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(&ana.token),
        Some(json!({ "user_id": sam.id, "action": "remove" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(&teacher.token),
        Some(json!({ "user_id": sam.id, "action": "remove" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(&teacher.token),
        Some(json!({ "user_id": ana.id, "action": "remove" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member_count"], 1);

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(&teacher.token),
        Some(json!({ "user_id": ana.id, "action": "remove" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_and_delete_group(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tina", UserRole::Teacher).await;
    let sam = create_test_user(&pool, "Sam", UserRole::Student).await;
    let ana = create_test_user(&pool, "Ana", UserRole::Student).await;
    let olly = create_test_user(&pool, "Olly", UserRole::Student).await;

    let module_id = create_module(&pool, &teacher, "Algorithms").await;
    enroll(&pool, module_id, &sam).await;
    enroll(&pool, module_id, &ana).await;
    enroll(&pool, module_id, &olly).await;
    let group_id = create_group(&pool, module_id, "Team", &[&sam, &ana]).await;

    let app = setup_test_app(pool);
    let uri = format!("/api/groups/{}", group_id);

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&sam.token),
        Some(json!({ "coordinator_id": olly.id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&sam.token),
        Some(json!({ "name": "Renamed", "coordinator_id": ana.id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["coordinator_id"], ana.id.to_string());

    let (status, _) = send(&app, "DELETE", &uri, Some(&ana.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &uri, Some(&teacher.token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
