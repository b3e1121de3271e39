//! Postgres implementation of the credential repository.
//!
//! Tables: `clients`, `tenants`, `users`, `user_roles`. Tenants and
//! clients are provisioned by operator tooling; this repository only ever
//! writes user rows, role sets, and the `updated_at` touch on clients.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::error;

use session_core::domain::entities::{Client, User};
use session_core::errors::{DomainError, DomainResult};
use session_core::repositories::CredentialRepository;

/// Credential repository over a SQLx Postgres pool.
pub struct PgCredentialRepository {
    pool: PgPool,
}

impl PgCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_client(row: &sqlx::postgres::PgRow) -> DomainResult<Client> {
        let rate_limit: i32 = row.try_get("rate_limit").map_err(db_error)?;

        Ok(Client {
            id: row.try_get("id").map_err(db_error)?,
            client_id: row.try_get("client_id").map_err(db_error)?,
            client_secret_hash: row.try_get("client_secret_hash").map_err(db_error)?,
            rate_limit: rate_limit.max(0) as u32,
            tenant_id: row.try_get("tenant_id").map_err(db_error)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(db_error)?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(db_error)?,
        })
    }

    fn row_to_user(row: &sqlx::postgres::PgRow) -> DomainResult<User> {
        Ok(User {
            id: row.try_get("id").map_err(db_error)?,
            tenant_id: row.try_get("tenant_id").map_err(db_error)?,
            full_name: row.try_get("full_name").map_err(db_error)?,
            phone_number: row.try_get("phone_number").map_err(db_error)?,
            email: row.try_get("email").map_err(db_error)?,
        })
    }
}

#[async_trait]
impl CredentialRepository for PgCredentialRepository {
    async fn get_client(&self, client_id: &str) -> DomainResult<Option<Client>> {
        let query = r#"
            SELECT id, client_id, client_secret_hash, rate_limit, tenant_id,
                   created_at, updated_at
            FROM clients
            WHERE client_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to load client {}: {}", client_id, e);
                db_error(e)
            })?;

        row.as_ref().map(Self::row_to_client).transpose()
    }

    async fn touch_client(&self, client_id: &str) -> DomainResult<()> {
        sqlx::query("UPDATE clients SET updated_at = NOW() WHERE client_id = $1")
            .bind(client_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn tenant_exists(&self, tenant_id: &str) -> DomainResult<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM tenants WHERE id = $1) AS present")
            .bind(tenant_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        row.try_get("present").map_err(db_error)
    }

    async fn get_user(&self, user_id: &str) -> DomainResult<Option<User>> {
        let query = r#"
            SELECT id, tenant_id, full_name, phone_number, email
            FROM users
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to load user {}: {}", user_id, e);
                db_error(e)
            })?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn get_user_roles(&self, user_id: &str) -> DomainResult<Vec<String>> {
        let rows = sqlx::query("SELECT role FROM user_roles WHERE user_id = $1 ORDER BY role")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.iter()
            .map(|row| row.try_get("role").map_err(db_error))
            .collect()
    }

    async fn upsert_user_with_roles(
        &self,
        user: &User,
        roles: Option<&[String]>,
    ) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // Empty-string PII is stored as NULL.
        let email = user.email.as_deref().filter(|email| !email.is_empty());

        let upsert = r#"
            INSERT INTO users (id, tenant_id, full_name, phone_number, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            ON CONFLICT (id) DO UPDATE
            SET tenant_id = EXCLUDED.tenant_id,
                full_name = EXCLUDED.full_name,
                phone_number = EXCLUDED.phone_number,
                email = EXCLUDED.email,
                updated_at = NOW()
        "#;

        sqlx::query(upsert)
            .bind(&user.id)
            .bind(&user.tenant_id)
            .bind(&user.full_name)
            .bind(&user.phone_number)
            .bind(email)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        if let Some(roles) = roles {
            sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
                .bind(&user.id)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;

            for role in roles {
                sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
                    .bind(&user.id)
                    .bind(role)
                    .execute(&mut *tx)
                    .await
                    .map_err(db_error)?;
            }
        }

        tx.commit().await.map_err(db_error)
    }
}

fn db_error(e: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("database error: {}", e),
    }
}
