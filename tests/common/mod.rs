use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use taskly::router::init_router;
use taskly::state::AppState;
use taskly::taskly_config::{CorsConfig, SESSION_COOKIE_NAME, SessionConfig};
use taskly::taskly_db::MemoryStore;
use tower::ServiceExt;

pub const PASSWORD: &str = "Passw0rd!";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Value of the `session_token` cookie set by this response, if any.
    #[allow(dead_code)]
    pub fn session_cookie(&self) -> Option<String> {
        self.set_cookie_header().and_then(|raw| {
            raw.split(';')
                .next()
                .and_then(|pair| pair.strip_prefix(&format!("{SESSION_COOKIE_NAME}=")))
                .map(str::to_string)
        })
    }

    #[allow(dead_code)]
    pub fn set_cookie_header(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with(SESSION_COOKIE_NAME))
            .map(str::to_string)
    }
}

pub fn test_app() -> TestApp {
    test_app_with(SessionConfig::default())
}

pub fn test_app_with(session_config: SessionConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::with_store(store.clone(), session_config, CorsConfig::default());
    TestApp {
        router: init_router(state, None),
        store,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE_NAME}={token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    #[allow(dead_code)]
    pub async fn register(&self, username: &str, email: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/auth/register",
            Some(json!({ "username": username, "email": email, "password": PASSWORD })),
            None,
        )
        .await
    }

    #[allow(dead_code)]
    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/auth/login",
            Some(json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    /// Registers `username` and logs in, returning the user id and session
    /// token.
    #[allow(dead_code)]
    pub async fn register_and_login(&self, username: &str) -> (i64, String) {
        let email = format!("{username}@x.com");
        let registered = self.register(username, &email).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{:?}", registered.body);

        let login = self.login(&email, PASSWORD).await;
        assert_eq!(login.status, StatusCode::OK, "{:?}", login.body);
        let token = login.session_cookie().expect("session cookie");

        (registered.body["id"].as_i64().unwrap(), token)
    }

    #[allow(dead_code)]
    pub async fn create_task(&self, token: &str, title: &str, status: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/tasks",
            Some(json!({ "title": title, "status": status })),
            Some(token),
        )
        .await
    }
}
