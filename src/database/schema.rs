use sqlx::SqlitePool;
use tracing::info;

use crate::database::manager::DatabaseError;

const CREATE_ANALYSTS: &str = r#"
CREATE TABLE IF NOT EXISTS analysts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT,
    login_name TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
)"#;

// AUTOINCREMENT keeps ids strictly increasing and never reused after a delete
const CREATE_PROPOSALS: &str = r#"
CREATE TABLE IF NOT EXISTS proposals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    email TEXT,
    phone1 TEXT,
    phone2 TEXT,
    operation_code TEXT,
    operation_code_complement TEXT,
    production_group TEXT,
    payment_method TEXT,
    installments TEXT,
    contract_type TEXT,
    insurance_type TEXT,
    analyst_id INTEGER,
    creation_date TEXT NOT NULL,
    FOREIGN KEY (analyst_id) REFERENCES analysts(id)
)"#;

/// Create both tables if they do not exist yet.
pub async fn bootstrap(pool: &SqlitePool) -> Result<(), DatabaseError> {
    for (table, ddl) in [("analysts", CREATE_ANALYSTS), ("proposals", CREATE_PROPOSALS)] {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::Migration(format!("{}: {}", table, e)))?;
        info!("Table {} created or already exists", table);
    }
    Ok(())
}
