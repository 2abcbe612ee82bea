//! In-process fixture service
//!
//! Serves the `/users` surface of the upstream fixture backed by the
//! canned dataset, the console page the browser smoke test navigates
//! to, and a `/health` readiness endpoint. Writes echo back without
//! persisting, matching the upstream fixture's behavior.

use axum::{
    extract::{Path, Query},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use vigil_client::UserFilter;

use crate::data::{dataset, next_id};
use crate::error::{FixtureError, FixtureResult};

/// Content type the upstream fixture serves for JSON bodies
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Title of the console page, asserted by the browser smoke test
pub const CONSOLE_TITLE: &str = "Vigil Fixture Console";

const CONSOLE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Vigil Fixture Console</title>
</head>
<body>
    <h1>Vigil Fixture Console</h1>
    <p>Local stand-in for the users fixture service.</p>
    <ul>
        <li><a href="/users">/users</a></li>
        <li><a href="/health">/health</a></li>
    </ul>
</body>
</html>
"#;

/// Build the fixture router
pub fn router() -> Router {
    Router::new()
        .route("/", get(console_page_handler))
        .route("/health", get(health_handler))
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/users/:id",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .layer(TraceLayer::new_for_http())
}

/// Handle to an in-process fixture service on a background task
pub struct FixtureServer {
    base_url: String,
    port: u16,
    server: JoinHandle<()>,
}

impl FixtureServer {
    /// Bind a free loopback port and start serving
    pub async fn spawn() -> FixtureResult<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .map_err(FixtureError::Bind)?;
        let port = listener.local_addr()?.port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router()).await {
                error!("Fixture service stopped: {}", e);
            }
        });

        info!("Fixture service listening on {}", base_url);
        Ok(Self {
            base_url,
            port,
            server,
        })
    }

    /// Base URL, also the root of the users API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// URL of the console page
    pub fn console_url(&self) -> String {
        format!("{}/", self.base_url)
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// JSON response carrying the upstream fixture's exact Content-Type
struct FixtureJson<T>(StatusCode, T);

impl<T: Serialize> IntoResponse for FixtureJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.1) {
            Ok(bytes) => {
                let mut response = (self.0, bytes).into_response();
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(JSON_CONTENT_TYPE),
                );
                response
            }
            Err(e) => {
                error!("Failed to encode response body: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// The upstream fixture answers unknown ids and deletes with `{}`
fn empty_object(status: StatusCode) -> Response {
    FixtureJson(status, serde_json::json!({})).into_response()
}

fn into_object(payload: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match payload {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}

async fn console_page_handler() -> Html<&'static str> {
    Html(CONSOLE_PAGE)
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "vigil-fixture"
    }))
}

async fn list_users_handler(Query(filter): Query<UserFilter>) -> Response {
    let users: Vec<_> = dataset().iter().filter(|u| filter.matches(u)).collect();
    FixtureJson(StatusCode::OK, users).into_response()
}

async fn get_user_handler(Path(id): Path<u64>) -> Response {
    match dataset().iter().find(|u| u.id == id) {
        Some(user) => FixtureJson(StatusCode::OK, user).into_response(),
        None => empty_object(StatusCode::NOT_FOUND),
    }
}

async fn create_user_handler(Json(payload): Json<serde_json::Value>) -> Response {
    let mut record = into_object(payload);
    record.insert("id".to_string(), next_id().into());
    FixtureJson(StatusCode::CREATED, serde_json::Value::Object(record)).into_response()
}

async fn update_user_handler(
    Path(id): Path<u64>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    if !dataset().iter().any(|u| u.id == id) {
        return empty_object(StatusCode::NOT_FOUND);
    }

    let mut record = into_object(payload);
    // The path id wins over any id in the payload
    record.insert("id".to_string(), id.into());
    FixtureJson(StatusCode::OK, serde_json::Value::Object(record)).into_response()
}

async fn delete_user_handler(Path(_id): Path<u64>) -> Response {
    empty_object(StatusCode::OK)
}
