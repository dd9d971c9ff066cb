//! Common test utilities for z-social integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

use z_social_service::{create_router, AppState, ServiceConfig};
use z_social_store::RocksStore;

/// Password used for every account registered through the harness.
pub const PASSWORD: &str = "correct horse battery staple";

/// An account registered through the API.
#[derive(Debug, Clone)]
pub struct TestAccount {
    /// Account id.
    pub id: u64,
    /// Session token.
    pub token: String,
}

impl TestAccount {
    /// `Authorization` header value carrying this account's token.
    pub fn bearer(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token))
            .expect("token is a valid header value")
    }
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// Temporary directory for uploaded pictures.
    pub upload_dir: TempDir,
    /// Picture size limit in effect.
    pub max_upload_bytes: usize,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a harness after adjusting the default test config.
    pub fn with_config(adjust: impl FnOnce(&mut ServiceConfig)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let upload_dir = TempDir::new().expect("Failed to create upload directory");
        let store = RocksStore::open(temp_dir.path()).expect("Failed to open store");

        let mut config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            upload_dir: upload_dir.path().to_string_lossy().to_string(),
            secret_key: "test-secret".into(),
            cors_origins: vec!["*".into()],
            ..ServiceConfig::default()
        };
        adjust(&mut config);

        let max_upload_bytes = config.max_upload_bytes;
        let state = AppState::new(Arc::new(store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
            upload_dir,
            max_upload_bytes,
        }
    }

    /// Register `username` and return its id and token.
    pub async fn register(&self, username: &str) -> TestAccount {
        let response = self
            .server
            .post("/v1/auth/register")
            .json(&json!({ "username": username, "password": PASSWORD }))
            .await;
        response.assert_status_ok();

        session(&response.json())
    }

    /// Number of files in the upload directory.
    pub fn stored_pictures(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the account id and token out of a register/login response.
pub fn session(body: &serde_json::Value) -> TestAccount {
    TestAccount {
        id: body["account"]["id"].as_u64().expect("account id"),
        token: body["token"].as_str().expect("token").to_string(),
    }
}
