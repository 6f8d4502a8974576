#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;
use tower::ServiceExt;

use person_api::auth::IdentityStore;
use person_api::config::AppConfig;
use person_api::database::DatabaseManager;
use person_api::services::PersonService;
use person_api::{app, AppState};

pub const READER: (&str, &str) = ("testUsername", "testPassword");
pub const WRITER: (&str, &str) = ("admin", "testPassword");

/// Fresh in-process router over its own in-memory SQLite database
pub async fn test_app() -> Result<Router> {
    test_app_with(AppConfig::development()).await
}

/// Same as [`test_app`] with a caller-supplied configuration
pub async fn test_app_with(config: AppConfig) -> Result<Router> {
    let repository = DatabaseManager::connect(&config.database).await?;
    let identities = IdentityStore::with_default_identities(4)?;
    Ok(app(AppState::new(PersonService::new(repository), identities), &config))
}

pub fn basic_header((username, password): (&str, &str)) -> String {
    let token = general_purpose::STANDARD.encode(format!("{}:{}", username, password));
    format!("Basic {}", token)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("body is not JSON ({}): {}", e, self.text()))
    }
}

/// Drive one request through the router
pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    credentials: Option<(&str, &str)>,
    body: Option<Value>,
) -> Result<TestResponse> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(credentials) = credentials {
        builder = builder.header(header::AUTHORIZATION, basic_header(credentials));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    send(app, request).await
}

pub async fn send(app: &Router, request: Request<Body>) -> Result<TestResponse> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(TestResponse { status, headers, body })
}

/// Create a person as the READ_WRITE identity and return the stored JSON
pub async fn create_person(app: &Router, body: Value) -> Result<Value> {
    let res = call(app, Method::POST, "/v1/post-person", Some(WRITER), Some(body)).await?;
    anyhow::ensure!(res.status == StatusCode::CREATED, "expected 201, got {}: {}", res.status, res.text());
    Ok(res.json())
}

/// The real binary, listening on a free port against an in-memory database.
/// The process is killed when this is dropped.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let server = Self::spawn()?;
        server.wait_ready(Duration::from_secs(20)).await?;
        Ok(server)
    }

    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_person-api"));
        cmd.env("APP_ENV", "development")
            .env("PERSON_API_PORT", port.to_string())
            .env("DATABASE_URL", "sqlite::memory:")
            .env("SECURITY_PASSWORD_HASH_COST", "4")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
