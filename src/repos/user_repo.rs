/*
 * Responsibility
 * - SQLx lookup against the users table
 * - takes a PgPool and exposes it through UserStore
 * - DB errors go up as RepoError; the validator decides what they mean
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool, postgres::PgPoolOptions};

use crate::repos::error::RepoResult;
use crate::repos::user_store::{UserRecord, UserStore};

#[derive(Debug, FromRow)]
struct UserRow {
    email: String,
    password_hash: String,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord::new(row.email, row.password_hash)
    }
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> RepoResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn find(&self, identifier: &str) -> RepoResult<Option<UserRecord>> {
        // `=` on text is case-sensitive; keep it that way.
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT email, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRecord::from))
    }
}
