use sqlx::SqlitePool;
use thiserror::Error;

use crate::auth::{CredentialError, CredentialService};
use crate::database::manager::DatabaseError;
use crate::database::models::Analyst;

#[derive(Debug, Error)]
pub enum AnalystError {
    #[error("Login name already registered: {0}")]
    DuplicateLogin(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub struct AnalystRepository {
    pool: SqlitePool,
    credentials: CredentialService,
}

impl AnalystRepository {
    pub fn new(pool: SqlitePool, credentials: CredentialService) -> Self {
        Self { pool, credentials }
    }

    /// Register an analyst, storing only the bcrypt digest of `password`.
    pub async fn create(
        &self,
        full_name: Option<&str>,
        login_name: &str,
        password: &str,
    ) -> Result<i64, AnalystError> {
        let password_hash = self.credentials.hash(password).await?;

        let result = sqlx::query(
            "INSERT INTO analysts (full_name, login_name, password_hash) VALUES (?, ?, ?)",
        )
        .bind(full_name)
        .bind(login_name)
        .bind(password_hash)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AnalystError::DuplicateLogin(login_name.to_string()))
            }
            Err(e) => Err(DatabaseError::from(e).into()),
        }
    }

    pub async fn find_by_login_name(&self, login_name: &str) -> Result<Option<Analyst>, DatabaseError> {
        let analyst = sqlx::query_as::<_, Analyst>(
            "SELECT id, full_name, login_name, password_hash FROM analysts WHERE login_name = ?",
        )
        .bind(login_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(analyst)
    }
}
