use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Analyst {
    pub id: i64,
    pub full_name: Option<String>,
    pub login_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}
