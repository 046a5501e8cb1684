mod common;

use axum::http::{Method, StatusCode};
use chrono::{TimeDelta, Utc};
use common::{PASSWORD, test_app, test_app_with};
use serde_json::json;
use taskly::taskly_config::SessionConfig;
use taskly::taskly_db::SessionStore;

#[tokio::test]
async fn test_register_success() {
    let app = test_app();

    let response = app.register("alice", "alice@x.com").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["username"], "alice");
    assert_eq!(response.body["email"], "alice@x.com");
    assert!(response.body.get("password").is_none());
    assert!(response.body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let app = test_app();
    app.register("alice", "alice@x.com").await;

    let same_email = app.register("alice2", "alice@x.com").await;
    assert_eq!(same_email.status, StatusCode::CONFLICT);
    assert!(same_email.body["error"].is_string());

    let same_username = app.register("alice", "other@x.com").await;
    assert_eq!(same_username.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_weak_passwords() {
    let app = test_app();

    for password in ["password", "PASSWORD1", "password1", "Pass1", "Password"] {
        let response = app
            .send(
                Method::POST,
                "/auth/register",
                Some(json!({ "username": "alice", "email": "alice@x.com", "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "password {password}");
    }
}

#[tokio::test]
async fn test_register_rejects_bad_username_and_email() {
    let app = test_app();

    let cases = [
        json!({ "username": "al", "email": "alice@x.com", "password": PASSWORD }),
        json!({ "username": "alice!", "email": "alice@x.com", "password": PASSWORD }),
        json!({ "username": "a".repeat(21), "email": "alice@x.com", "password": PASSWORD }),
        json!({ "username": "alice", "email": "not-an-email", "password": PASSWORD }),
        json!({ "username": "alice", "email": format!("{}@x.com", "a".repeat(50)), "password": PASSWORD }),
        json!({ "username": "alice", "email": "alice@x.com" }),
    ];
    for body in cases {
        let response = app
            .send(Method::POST, "/auth/register", Some(body.clone()), None)
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert!(response.body["error"].is_string());
    }
}

#[tokio::test]
async fn test_login_sets_hardened_cookie() {
    let app = test_app();
    app.register("alice", "alice@x.com").await;

    let response = app.login("alice@x.com", PASSWORD).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["username"], "alice");
    assert!(response.body["expires_at"].is_string());

    let cookie = response.set_cookie_header().unwrap();
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Secure"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=86400"));

    let token = response.session_cookie().unwrap();
    assert_eq!(token.len(), 64);
    assert!(!response.body.to_string().contains(&token));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = test_app();
    app.register("alice", "alice@x.com").await;
    app.send(
        Method::POST,
        "/users",
        Some(json!({ "username": "nopass", "email": "nopass@x.com" })),
        None,
    )
    .await;

    let unknown = app.login("ghost@x.com", PASSWORD).await;
    let wrong = app.login("alice@x.com", "Wrong1234").await;
    let no_password = app.login("nopass@x.com", PASSWORD).await;

    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(no_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body, wrong.body);
    assert_eq!(wrong.body, no_password.body);
    assert_eq!(unknown.body["error"], "Invalid email or password");
    assert!(unknown.session_cookie().is_none());
}

#[tokio::test]
async fn test_each_login_creates_a_separate_session() {
    let app = test_app();
    app.register("alice", "alice@x.com").await;

    let first = app.login("alice@x.com", PASSWORD).await.session_cookie().unwrap();
    let second = app.login("alice@x.com", PASSWORD).await.session_cookie().unwrap();

    assert_ne!(first, second);
    for token in [&first, &second] {
        let response = app.send(Method::GET, "/tasks", None, Some(token)).await;
        assert_eq!(response.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_protected_route_without_cookie() {
    let app = test_app();

    let response = app.send(Method::GET, "/tasks", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let empty = app.send(Method::GET, "/tasks", None, Some("")).await;
    assert_eq!(empty.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_and_unknown_tokens_are_rejected_alike() {
    let app = test_app();
    let (_, token) = app.register_and_login("alice").await;

    assert!(
        app.store
            .set_session_expiry(&token, Utc::now() - TimeDelta::seconds(1))
            .await
    );

    let expired = app.send(Method::GET, "/tasks", None, Some(&token)).await;
    let unknown = app
        .send(Method::GET, "/tasks", None, Some(&"f".repeat(64)))
        .await;

    assert_eq!(expired.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(expired.body, unknown.body);
}

#[tokio::test]
async fn test_logout_clears_cookie_and_revokes_session() {
    let app = test_app();
    let (_, token) = app.register_and_login("alice").await;

    let response = app.send(Method::POST, "/auth/logout", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let cookie = response.set_cookie_header().unwrap();
    assert!(cookie.starts_with("session_token=;"));
    assert!(cookie.contains("Max-Age=0"));

    assert!(app.store.find_session(&token).await.unwrap().is_none());
    let after = app.send(Method::GET, "/tasks", None, Some(&token)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cookie_only_logout_keeps_session_valid() {
    let app = test_app_with(SessionConfig {
        revoke_on_logout: false,
        ..SessionConfig::default()
    });
    let (_, token) = app.register_and_login("alice").await;

    let response = app.send(Method::POST, "/auth/logout", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let after = app.send(Method::GET, "/tasks", None, Some(&token)).await;
    assert_eq!(after.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_requires_session() {
    let app = test_app();

    let response = app.send(Method::POST, "/auth/logout", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = test_app();

    let response = app
        .send(Method::POST, "/auth/login", Some(json!({ "email": "a@x.com" })), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "password is required");
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app();

    let response = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
