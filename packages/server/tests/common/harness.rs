//! Test harnesses for integration testing.
//!
//! `TestHarness` wires both routers to in-memory mocks seeded with a small
//! fixture world. `PostgresHarness` runs against a shared Postgres container;
//! the container starts and migrations run once, on the first test that asks.

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use serde_json::Value;
use spark_core::kernel::test_dependencies::{MemoryDocumentStore, MockAI};
use spark_core::kernel::TestDependencies;
use spark_core::server::{build_app, build_chat_app};
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use tower::ServiceExt;

use super::seed_world;

fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// In-memory harness
// =============================================================================

/// Both routers over mocks seeded by [`seed_world`].
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let (status, body) = ctx.get("/health").await;
/// }
/// ```
pub struct TestHarness {
    pub deps: TestDependencies,
    /// Clock the fixture deadlines were computed from
    pub now: DateTime<Utc>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        init_tracing();
        let now = Utc::now();
        Self::with_store(seed_world(MemoryDocumentStore::new(), now), now)
    }
}

impl TestHarness {
    pub fn with_store(store: MemoryDocumentStore, now: DateTime<Utc>) -> Self {
        Self {
            deps: TestDependencies::new().with_store(store),
            now,
        }
    }

    /// Replace the AI mock (only the chat router uses it)
    pub fn with_ai(mut self, ai: MockAI) -> Self {
        self.deps = self.deps.with_ai(ai);
        self
    }

    pub fn app(&self) -> Router {
        build_app(self.deps.server_deps())
    }

    pub fn chat_app(&self) -> Router {
        build_chat_app(self.deps.chat_deps())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        send_text(self.app(), request).await
    }

    /// POST JSON to the dispatcher router
    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        send_json(self.app(), uri, body).await
    }

    /// POST JSON to the chat relay router
    pub async fn post_chat(&self, body: Value) -> (StatusCode, Value) {
        send_json(self.chat_app(), "/chat", body).await
    }

    /// Deliver a document event, asserting it was acknowledged
    pub async fn deliver(&self, event: Value) {
        let (status, _) = self.post("/events", event).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}

pub async fn send_text(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn send_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, text) = send_text(app, request).await;
    let json = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap()
    };
    (status, json)
}

// =============================================================================
// Postgres harness
// =============================================================================

struct SharedPostgres {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_POSTGRES: OnceCell<SharedPostgres> = OnceCell::const_new();

impl SharedPostgres {
    async fn init() -> Result<Self> {
        init_tracing();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let host = postgres.get_host().await?;
        let port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_POSTGRES
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared Postgres")
            })
            .await
    }
}

/// Fresh pool on the shared, migrated database.
///
/// Tests share one database, so each one uses its own ids.
pub struct PostgresHarness {
    pub db_pool: PgPool,
}

impl AsyncTestContext for PostgresHarness {
    async fn setup() -> Self {
        let shared = SharedPostgres::get().await;
        let db_pool = PgPool::connect(&shared.db_url)
            .await
            .expect("Failed to connect to test database");
        Self { db_pool }
    }
}
