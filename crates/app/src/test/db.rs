//! Per-test Postgres databases.
//!
//! One container is started lazily for the whole test binary. Every [`TestDb`] creates its own
//! freshly migrated database inside it, so service tests can commit freely without seeing each
//! other's rows. The databases disappear with the container.

use std::env;

use sqlx::{Connection, PgConnection, PgPool, postgres::PgPoolOptions, query};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::database;

const USER: &str = "bookshelf";
const PASSWORD: &str = "bookshelf";

struct PostgresServer {
    // Held so the container outlives every test.
    _container: ContainerAsync<Postgres>,
    host: String,
    port: u16,
}

static SERVER: OnceCell<PostgresServer> = OnceCell::const_new();

impl PostgresServer {
    async fn start() -> Self {
        let container = Postgres::default()
            .with_user(USER)
            .with_password(PASSWORD)
            .with_tag("17-alpine")
            .start()
            .await
            .expect("postgres container should start");

        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("postgres port should be mapped");

        let host = env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".into());

        Self {
            _container: container,
            host,
            port,
        }
    }

    fn url(&self, database: &str) -> String {
        format!(
            "postgresql://{USER}:{PASSWORD}@{}:{}/{database}",
            self.host, self.port
        )
    }
}

/// An isolated, migrated database.
#[derive(Debug, Clone)]
pub struct TestDb {
    pool: PgPool,
    name: String,
}

impl TestDb {
    pub async fn new() -> Self {
        let server = SERVER.get_or_init(PostgresServer::start).await;

        // Hex only, so the name never needs escaping.
        let name = format!("bookshelf_test_{}", Uuid::now_v7().simple());

        let mut admin = PgConnection::connect(&server.url("postgres"))
            .await
            .expect("admin connection should open");

        query(&format!("CREATE DATABASE {name}"))
            .execute(&mut admin)
            .await
            .expect("test database should be created");

        admin.close().await.expect("admin connection should close");

        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect(&server.url(&name))
            .await
            .expect("test database should accept connections");

        database::migrate(&pool)
            .await
            .expect("migrations should apply to a fresh database");

        Self { pool, name }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use sqlx::query_scalar;

    use super::*;

    #[tokio::test]
    async fn databases_are_isolated_and_migrated() {
        let first = TestDb::new().await;
        let second = TestDb::new().await;

        assert_ne!(first.name(), second.name(), "each test gets its own database");

        query("INSERT INTO genres (uuid, name, slug) VALUES ($1, 'Poetry', 'poetry')")
            .bind(Uuid::now_v7())
            .execute(first.pool())
            .await
            .expect("insert should succeed");

        let count: i64 = query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(second.pool())
            .await
            .expect("genres table should exist");

        assert_eq!(count, 0, "rows must not leak between test databases");
    }
}
