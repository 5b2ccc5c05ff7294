#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use pug_cafe::CafeStorage;
use pug_cafe::config::Config;
use pug_cafe::db::{Seeded, seed};
use pug_cafe::router::{CafeState, cafe_router};
use serde_json::Value;
use std::{
    fs,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A seeded database on a throwaway file plus the router serving it.
pub struct TestApp {
    pub app: Router,
    pub storage: CafeStorage,
    pub seeded: Seeded,
    db_path: PathBuf,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut db_path = std::env::temp_dir();
        db_path.push(format!(
            "pug-cafe-{}-{}-{}.sqlite",
            std::process::id(),
            nanos,
            DB_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let cfg = Config {
            database_url: format!("sqlite:{}", db_path.display()),
            ..Config::default()
        };
        let pool = cfg.connect().await.expect("failed to open test database");
        let storage = CafeStorage::new(pool);
        let seeded = seed(&storage).await.expect("failed to seed test database");
        let app = cafe_router(CafeState::new(storage.clone()));

        Self {
            app,
            storage,
            seeded,
            db_path,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send_to(self.app.clone(), method, uri, body).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.db_path);
        for suffix in ["-wal", "-shm"] {
            let mut sidecar = self.db_path.clone().into_os_string();
            sidecar.push(suffix);
            let _ = fs::remove_file(sidecar);
        }
    }
}

/// Send one request through `app`; the body is parsed as JSON when present.
pub async fn send_to(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let resp = app
        .oneshot(builder.body(body).expect("failed to build request"))
        .await
        .expect("request failed");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body was not JSON")
    };
    (status, value)
}

/// Names of every object in a JSON array response.
pub fn names(body: &Value) -> Vec<&str> {
    body.as_array()
        .expect("response body was not an array")
        .iter()
        .filter_map(|row| row["name"].as_str())
        .collect()
}
