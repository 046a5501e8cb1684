mod common;

use axum::http::{Method, StatusCode};
use common::test_app;
use serde_json::json;
use taskly::taskly_db::{SessionStore, TaskStore};
use taskly::taskly_models::UserId;

#[tokio::test]
async fn test_create_user_without_password() {
    let app = test_app();

    let response = app
        .send(
            Method::POST,
            "/users",
            Some(json!({ "username": "bob", "email": "bob@x.com" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["username"], "bob");
    assert!(response.body["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_create_user_rules() {
    let app = test_app();
    app.register("bob", "bob@x.com").await;

    let duplicate = app
        .send(
            Method::POST,
            "/users",
            Some(json!({ "username": "bob", "email": "new@x.com" })),
            None,
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let weak = app
        .send(
            Method::POST,
            "/users",
            Some(json!({ "username": "carol", "email": "carol@x.com", "password": "weak" })),
            None,
        )
        .await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_and_get_users() {
    let app = test_app();
    let alice = app.register("alice", "alice@x.com").await.body["id"]
        .as_i64()
        .unwrap();
    app.register("bob", "bob@x.com").await;

    let list = app.send(Method::GET, "/users", None, None).await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.body.as_array().unwrap().len(), 2);

    let one = app
        .send(Method::GET, &format!("/users/{alice}"), None, None)
        .await;
    assert_eq!(one.status, StatusCode::OK);
    assert_eq!(one.body["email"], "alice@x.com");

    let missing = app.send(Method::GET, "/users/9999", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let bad = app.send(Method::GET, "/users/abc", None, None).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_user() {
    let app = test_app();
    let alice = app.register("alice", "alice@x.com").await.body["id"]
        .as_i64()
        .unwrap();
    app.register("bob", "bob@x.com").await;
    let uri = format!("/users/{alice}");

    let renamed = app
        .send(
            Method::PUT,
            &uri,
            Some(json!({ "username": "alicia", "email": "alice@x.com" })),
            None,
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["username"], "alicia");

    let taken = app
        .send(
            Method::PUT,
            &uri,
            Some(json!({ "username": "alicia", "email": "bob@x.com" })),
            None,
        )
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);

    let incomplete = app
        .send(Method::PUT, &uri, Some(json!({ "username": "alicia" })), None)
        .await;
    assert_eq!(incomplete.status, StatusCode::BAD_REQUEST);

    let missing = app
        .send(
            Method::PUT,
            "/users/9999",
            Some(json!({ "username": "ghost", "email": "ghost@x.com" })),
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user_cascades_to_tasks_and_sessions() {
    let app = test_app();
    let (alice_id, token) = app.register_and_login("alice").await;
    app.create_task(&token, "Buy milk", "to-do").await;

    let response = app
        .send(Method::DELETE, &format!("/users/{alice_id}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    assert!(app.store.find_session(&token).await.unwrap().is_none());
    assert!(
        app.store
            .list_tasks(UserId(alice_id), None)
            .await
            .unwrap()
            .is_empty()
    );

    let after = app.send(Method::GET, "/tasks", None, Some(&token)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);

    let again = app
        .send(Method::DELETE, &format!("/users/{alice_id}"), None, None)
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}
