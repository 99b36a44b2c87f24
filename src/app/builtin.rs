//! Built-in applications.
//!
//! Small, dependency-free apps used by the shipped `demo` module and by
//! manifest-defined modules. Each builder returns a complete router that
//! answers on every path, so a bound server is exercisable immediately.

use axum::body::Bytes;
use axum::extract::Request;
use axum::http::{Method, Uri};
use axum::response::IntoResponse;
use axum::{Json, Router};

/// Body served by [`hello`] when no message is configured.
pub const DEFAULT_GREETING: &str = "Hello, world!";

/// Fixed text body on every path.
pub fn hello(message: impl Into<String>) -> Router {
    let message = message.into();
    Router::new().fallback(move || {
        let body = message.clone();
        async move { body }
    })
}

/// Echoes the request line and body back as plain text.
pub fn echo() -> Router {
    Router::new().fallback(echo_handler)
}

async fn echo_handler(method: Method, uri: Uri, body: Bytes) -> impl IntoResponse {
    let body = String::from_utf8_lossy(&body);
    format!("{} {}\n{}", method, uri, body)
}

/// JSON liveness body on every path.
pub fn health() -> Router {
    Router::new().fallback(health_handler)
}

async fn health_handler(_req: Request) -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// The module registered as `demo` by the shipped binary: enough surface to
/// start a server and exercise every locator form without writing an app.
///
/// ```text
/// demo                  → hello application
/// demo:echo             → echo application
/// demo:make_app()       → factory-built hello application
/// demo:api.health       → nested namespace walk
/// ```
pub fn demo_module() -> super::Module {
    super::Module::new()
        .with_app("application", hello(DEFAULT_GREETING))
        .with_app("echo", echo())
        .with_factory("make_app", || hello(DEFAULT_GREETING))
        .with_namespace("api", super::Module::new().with_app("health", health()))
}
