mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{create_test_user, send, setup_test_app};
use edugroup_models::{UserId, UserRole};

#[sqlx::test(migrations = "./migrations")]
async fn test_send_message(pool: PgPool) {
    let sam = create_test_user(&pool, "Sam", UserRole::Student).await;
    let tina = create_test_user(&pool, "Tina", UserRole::Teacher).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/messages",
        Some(&sam.token),
        Some(json!({ "recipient_id": tina.id, "content": "  Question about the project  " })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["content"], "Question about the project");
    assert_eq!(body["is_read"], false);
    assert_eq!(body["sender"]["first_name"], "Sam");
    assert_eq!(body["recipient"]["role"], "teacher");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_send_message_rejections(pool: PgPool) {
    let sam = create_test_user(&pool, "Sam", UserRole::Student).await;
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/messages",
        Some(&sam.token),
        Some(json!({ "recipient_id": sam.id, "content": "Hello me" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/messages",
        Some(&sam.token),
        Some(json!({ "recipient_id": UserId::new(), "content": "Hello?" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/messages",
        Some(&sam.token),
        Some(json!({ "recipient_id": UserId::new(), "content": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_inbox_outbox_and_mark_as_read(pool: PgPool) {
    let sam = create_test_user(&pool, "Sam", UserRole::Student).await;
    let ana = create_test_user(&pool, "Ana", UserRole::Coordinator).await;
    let app = setup_test_app(pool);

    let (_, message) = send(
        &app,
        "POST",
        "/api/messages",
        Some(&sam.token),
        Some(json!({ "recipient_id": ana.id, "content": "Meeting at 3?" })),
    )
    .await;
    let id = message["id"].as_str().unwrap();

    let (_, sent) = send(&app, "GET", "/api/messages/sent", Some(&sam.token), None).await;
    assert_eq!(sent.as_array().unwrap().len(), 1);

    let (_, received) = send(&app, "GET", "/api/messages/received", Some(&ana.token), None).await;
    assert_eq!(received[0]["id"], id);

    let read_uri = format!("/api/messages/{}/read", id);

    // Only the recipient may mark it read.
    let (status, _) = send(&app, "PUT", &read_uri, Some(&sam.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "PUT", &read_uri, Some(&ana.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_read"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_conversation_marks_peer_messages_read(pool: PgPool) {
    let sam = create_test_user(&pool, "Sam", UserRole::Student).await;
    let ana = create_test_user(&pool, "Ana", UserRole::Student).await;
    let app = setup_test_app(pool);

    for (from, to, content) in [
        (&ana, &sam, "Hi Sam"),
        (&sam, &ana, "Hi Ana"),
        (&ana, &sam, "Ready?"),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/messages",
            Some(&from.token),
            Some(json!({ "recipient_id": to.id, "content": content })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let uri = format!("/api/messages/conversation/{}", ana.id);

    let (status, thread) = send(&app, "GET", &uri, Some(&sam.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let thread = thread.as_array().unwrap();
    let contents: Vec<&str> = thread.iter().map(|m| m["content"].as_str().unwrap()).collect();
    assert_eq!(contents, vec!["Hi Sam", "Hi Ana", "Ready?"]);
    // The thread is returned as it was before being marked.
    assert_eq!(thread[2]["is_read"], false);

    let (_, received) = send(&app, "GET", "/api/messages/received", Some(&sam.token), None).await;
    assert!(received.as_array().unwrap().iter().all(|m| m["is_read"] == true));

    // Ana's copy of Sam's message is untouched.
    let (_, received) = send(&app, "GET", "/api/messages/received", Some(&ana.token), None).await;
    assert_eq!(received[0]["is_read"], false);

    let (status, thread) = send(
        &app,
        "GET",
        &format!("/api/messages/conversation/{}", UserId::new()),
        Some(&sam.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(thread.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_conversation_list(pool: PgPool) {
    let me = create_test_user(&pool, "Mia", UserRole::Student).await;
    let ana = create_test_user(&pool, "Ana", UserRole::Coordinator).await;
    let ben = create_test_user(&pool, "Ben", UserRole::Teacher).await;
    let app = setup_test_app(pool);

    for (from, to, content) in [
        (&ana, &me, "a1"),
        (&ana, &me, "a2"),
        (&ben, &me, "b1"),
        (&me, &ana, "reply to ana"),
    ] {
        send(
            &app,
            "POST",
            "/api/messages",
            Some(&from.token),
            Some(json!({ "recipient_id": to.id, "content": content })),
        )
        .await;
    }

    let (status, body) = send(
        &app,
        "GET",
        "/api/messages/conversations",
        Some(&me.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let conversations = body.as_array().unwrap();
    assert_eq!(conversations.len(), 2);

    assert_eq!(conversations[0]["peer_id"], ana.id.to_string());
    assert_eq!(conversations[0]["name"], "Ana Tester");
    assert_eq!(conversations[0]["peer_role"], "coordinator");
    assert_eq!(conversations[0]["last_message"], "reply to ana");
    assert_eq!(conversations[0]["unread_count"], 2);

    assert_eq!(conversations[1]["peer_id"], ben.id.to_string());
    assert_eq!(conversations[1]["unread_count"], 1);
}
