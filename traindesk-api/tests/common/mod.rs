//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - Test database setup (migrations applied) and cleanup
//! - A mailer that captures verification codes
//! - Request helpers that drive the router directly
//! - Registration helpers that produce a verified trainer and token
//!
//! Tests using [`TestContext`] need PostgreSQL at `DATABASE_URL`; they are
//! marked `#[ignore]` and run with `cargo test -- --ignored`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tower::Service as _;
use traindesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use traindesk_shared::{
    db::{
        migrations::run_migrations,
        pool::{create_pool, DatabaseConfig},
    },
    mail::{MailError, VerificationMailer},
};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Mailer that records the last code sent to each address
#[derive(Default)]
pub struct CapturingMailer {
    codes: Mutex<HashMap<String, String>>,
}

impl CapturingMailer {
    pub fn code_for(&self, email: &str) -> Option<String> {
        self.codes.lock().unwrap().get(email).cloned()
    }
}

#[async_trait]
impl VerificationMailer for CapturingMailer {
    async fn send_verification_code(
        &self,
        to_email: &str,
        _trainer_name: &str,
        code: &str,
    ) -> Result<(), MailError> {
        self.codes
            .lock()
            .unwrap()
            .insert(to_email.to_string(), code.to_string());
        Ok(())
    }
}

/// Mailer whose every delivery fails
pub struct FailingMailer;

#[async_trait]
impl VerificationMailer for FailingMailer {
    async fn send_verification_code(
        &self,
        _to_email: &str,
        _trainer_name: &str,
        _code: &str,
    ) -> Result<(), MailError> {
        Err(MailError::Send("relay unavailable".to_string()))
    }
}

/// A verified trainer with a session token
pub struct Trainer {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    pub config: Config,
    pub mailer: Arc<CapturingMailer>,

    /// Suffix making every email in this context unique
    tag: String,
}

impl TestContext {
    /// Connects, migrates and builds the app
    ///
    /// Panics when `DATABASE_URL` is unset.
    pub async fn new() -> Self {
        let url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must point at a PostgreSQL test database");

        let config = Config::from_vars(|key| match key {
            "DATABASE_URL" => Some(url.clone()),
            "JWT_SECRET" => Some(TEST_JWT_SECRET.to_string()),
            "DATABASE_MAX_CONNECTIONS" => Some("5".to_string()),
            _ => None,
        })
        .expect("test config should load");

        let db = create_pool(DatabaseConfig {
            url: config.database.url.clone(),
            max_connections: config.database.max_connections,
            ..Default::default()
        })
        .await
        .expect("database should be reachable");

        run_migrations(&db).await.expect("migrations should apply");

        let mailer = Arc::new(CapturingMailer::default());
        let state = AppState::new(db.clone(), config.clone(), mailer.clone());
        let app = build_router(state);

        Self {
            db,
            app,
            config,
            mailer,
            tag: Uuid::new_v4().simple().to_string(),
        }
    }

    /// Same database and config, different mailer
    pub fn app_with_mailer(&self, mailer: Arc<dyn VerificationMailer>) -> Router {
        build_router(AppState::new(self.db.clone(), self.config.clone(), mailer))
    }

    /// Unique email for this context
    pub fn email(&self, name: &str) -> String {
        format!("{}-{}@traindesk.test", name, self.tag)
    }

    /// Sends a request through the router and returns status and JSON body
    ///
    /// Empty bodies come back as `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(&self.app, method, uri, token, body).await
    }

    /// Registers an account and returns the response
    pub async fn register(&self, email: &str, password: &str, name: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "email": email,
                "password": password,
                "trainer_name": name,
            })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    pub async fn verify(&self, email: &str, code: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/auth/verify-email",
            None,
            Some(json!({ "email": email, "code": code })),
        )
        .await
    }

    /// Registers, verifies and logs in a trainer
    pub async fn verified_trainer(&self, name: &str) -> Trainer {
        let email = self.email(name);
        let (status, body) = self.register(&email, "secret1", name).await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let code = self.mailer.code_for(&email).expect("code should be captured");
        let (status, body) = self.verify(&email, &code).await;
        assert_eq!(status, StatusCode::OK, "verify failed: {}", body);

        let (status, body) = self.login(&email, "secret1").await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        Trainer {
            id: body["id"].as_str().unwrap().parse().unwrap(),
            email,
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a client and returns its id
    pub async fn create_client(&self, trainer: &Trainer, first: &str, last: &str) -> Uuid {
        let (status, body) = self
            .request(
                Method::POST,
                "/clients",
                Some(&trainer.token),
                Some(json!({ "first_name": first, "last_name": last })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create client failed: {}", body);

        body["id"].as_str().unwrap().parse().unwrap()
    }

    /// Number of workouts stored for a trainer
    pub async fn workout_count(&self, trainer_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM workouts WHERE user_id = $1")
            .bind(trainer_id)
            .fetch_one(&self.db)
            .await
            .unwrap()
    }

    /// Deletes every account created through this context
    ///
    /// Clients, workouts, links and verification records cascade.
    pub async fn cleanup(&self) {
        sqlx::query("DELETE FROM users WHERE email LIKE $1")
            .bind(format!("%-{}@traindesk.test", self.tag))
            .execute(&self.db)
            .await
            .unwrap();
    }
}

/// Sends a request through `app`
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_raw(app, request).await
}

/// Sends a prebuilt request through `app`
pub async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().call(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    (status, body)
}
