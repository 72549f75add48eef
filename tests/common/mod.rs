#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::TimeDelta;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use app_salud::config::{AuthConfig, SessionConfig};
use app_salud::{build_router, AppState};

pub const SECRET: &str = "test-secret";

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: SECRET.to_string(),
        using_default_secret: false,
        token_ttl: TimeDelta::hours(24),
        bcrypt_cost: 4,
    }
}

/// Router over fresh in-memory stores, plus the state for direct seeding.
pub fn app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::in_memory(&auth_config(), SessionConfig::default()));
    (build_router(state.clone()), state)
}

pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    /// `appSalud.sid=<value>` from `Set-Cookie`, if one was sent.
    pub cookie: Option<String>,
    pub location: Option<String>,
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    for &(name, value) in headers {
        builder = builder.header(name, value);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let cookie = resp
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("appSalud.sid="))
        .map(|v| v.split(';').next().unwrap_or_default().to_string());
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply {
        status,
        body,
        cookie,
        location,
    }
}

pub async fn get(app: &Router, uri: &str, headers: &[(&str, &str)]) -> Reply {
    send(app, Method::GET, uri, None, headers).await
}

pub async fn post(app: &Router, uri: &str, body: Value, headers: &[(&str, &str)]) -> Reply {
    send(app, Method::POST, uri, Some(body), headers).await
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Registers an account and returns its token.
pub async fn register(app: &Router, username: &str, rol: &str) -> String {
    let reply = post(
        app,
        "/api/auth/registro",
        serde_json::json!({
            "username": username,
            "password": "secret1",
            "email": format!("{}@x.com", username),
            "rol": rol,
        }),
        &[],
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    reply.body["token"].as_str().unwrap().to_string()
}
