use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewProposal, Proposal, ProposalFields, ProposalWithAnalyst};

pub struct ProposalRepository {
    pool: SqlitePool,
}

impl ProposalRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a proposal stamped with today's local date and return its id.
    pub async fn create(&self, proposal: &NewProposal) -> Result<i64, DatabaseError> {
        self.insert(proposal, Local::now().date_naive()).await
    }

    async fn insert(
        &self,
        proposal: &NewProposal,
        creation_date: NaiveDate,
    ) -> Result<i64, DatabaseError> {
        let f = &proposal.fields;
        let done = sqlx::query(
            "INSERT INTO proposals (name, email, phone1, phone2, operation_code, operation_code_complement,
                                    production_group, payment_method, installments, contract_type,
                                    insurance_type, analyst_id, creation_date)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(f.name.as_deref())
        .bind(f.email.as_deref())
        .bind(f.phone1.as_deref())
        .bind(f.phone2.as_deref())
        .bind(f.operation_code.as_deref())
        .bind(f.operation_code_complement.as_deref())
        .bind(f.production_group.as_deref())
        .bind(f.payment_method.as_deref())
        .bind(f.installments.as_deref())
        .bind(f.contract_type.as_deref())
        .bind(f.insurance_type.as_deref())
        .bind(proposal.analyst_id)
        .bind(creation_date)
        .execute(&self.pool)
        .await?;

        Ok(done.last_insert_rowid())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Proposal>, DatabaseError> {
        let proposal = sqlx::query_as::<_, Proposal>("SELECT * FROM proposals WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(proposal)
    }

    /// Proposals created between `start` and `end` inclusive, joined with the
    /// analyst's display name. Proposals whose analyst does not exist are left out.
    pub async fn list_by_date_range(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<ProposalWithAnalyst>, DatabaseError> {
        let (Some(start), Some(end)) = (start, end) else {
            return Err(DatabaseError::InvalidArgument(
                "startDate and endDate are required".to_string(),
            ));
        };
        let start = normalize_date(start)?;
        let end = normalize_date(end)?;

        let rows = sqlx::query_as::<_, ProposalWithAnalyst>(
            "SELECT p.id, p.name, p.email, p.phone1, p.phone2, p.operation_code, p.operation_code_complement,
                    p.production_group, p.payment_method, p.installments, p.contract_type, p.insurance_type,
                    a.full_name AS analyst_name, p.creation_date
             FROM proposals p
             JOIN analysts a ON p.analyst_id = a.id
             WHERE date(p.creation_date) >= date(?) AND date(p.creation_date) <= date(?)
             ORDER BY p.id",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Replace every business and contact field. Fields absent from `fields`
    /// are cleared. Returns the number of rows changed.
    pub async fn update(&self, id: i64, fields: &ProposalFields) -> Result<u64, DatabaseError> {
        let done = sqlx::query(
            "UPDATE proposals
             SET name = ?, email = ?, phone1 = ?, phone2 = ?, operation_code = ?, operation_code_complement = ?,
                 production_group = ?, payment_method = ?, installments = ?, contract_type = ?, insurance_type = ?
             WHERE id = ?",
        )
        .bind(fields.name.as_deref())
        .bind(fields.email.as_deref())
        .bind(fields.phone1.as_deref())
        .bind(fields.phone2.as_deref())
        .bind(fields.operation_code.as_deref())
        .bind(fields.operation_code_complement.as_deref())
        .bind(fields.production_group.as_deref())
        .bind(fields.payment_method.as_deref())
        .bind(fields.installments.as_deref())
        .bind(fields.contract_type.as_deref())
        .bind(fields.insurance_type.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(done.rows_affected())
    }

    pub async fn delete(&self, id: i64) -> Result<u64, DatabaseError> {
        let done = sqlx::query("DELETE FROM proposals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(done.rows_affected())
    }
}

/// Reduce a date or timestamp to its calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (the date in their own offset)
/// and naive `YYYY-MM-DDTHH:MM:SS[.fff]` or `YYYY-MM-DD HH:MM:SS[.fff]` values.
pub fn normalize_date(raw: &str) -> Result<NaiveDate, DatabaseError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts.date());
        }
    }
    Err(DatabaseError::InvalidArgument(format!(
        "'{}' is not a calendar date",
        raw
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::DatabaseManager;

    async fn setup() -> (SqlitePool, ProposalRepository) {
        let db = DatabaseManager::connect(&AppConfig::testing().database)
            .await
            .unwrap();
        let pool = db.pool().clone();
        sqlx::query("INSERT INTO analysts (full_name, login_name, password_hash) VALUES ('Ana Souza', 'ana', 'x')")
            .execute(&pool)
            .await
            .unwrap();
        (pool.clone(), ProposalRepository::new(pool))
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn submission(name: &str, analyst_id: Option<i64>) -> NewProposal {
        NewProposal {
            fields: ProposalFields {
                name: Some(name.to_string()),
                email: Some(format!("{}@example.com", name)),
                installments: Some("12".to_string()),
                ..Default::default()
            },
            analyst_id,
        }
    }

    #[tokio::test]
    async fn create_stamps_today_and_assigns_increasing_ids() {
        let (_, repo) = setup().await;

        let first = repo.create(&submission("joao", Some(1))).await.unwrap();
        let second = repo.create(&submission("maria", Some(1))).await.unwrap();
        assert!(second > first);

        let stored = repo.get_by_id(first).await.unwrap().unwrap();
        assert_eq!(stored.creation_date, Local::now().date_naive());
        assert_eq!(stored.fields.name.as_deref(), Some("joao"));
        assert_eq!(stored.fields.phone1, None);
        assert_eq!(stored.analyst_id, Some(1));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let (_, repo) = setup().await;

        let first = repo.create(&submission("a", Some(1))).await.unwrap();
        assert_eq!(repo.delete(first).await.unwrap(), 1);
        let second = repo.create(&submission("b", Some(1))).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn dangling_analyst_is_accepted_on_write() {
        let (_, repo) = setup().await;

        let id = repo.create(&submission("orphan", Some(404))).await.unwrap();
        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.analyst_id, Some(404));
    }

    #[tokio::test]
    async fn range_is_inclusive_by_calendar_date() {
        let (_, repo) = setup().await;

        let before = repo.insert(&submission("before", Some(1)), date("2024-03-09")).await.unwrap();
        let first = repo.insert(&submission("first", Some(1)), date("2024-03-10")).await.unwrap();
        let middle = repo.insert(&submission("middle", Some(1)), date("2024-03-12")).await.unwrap();
        let last = repo.insert(&submission("last", Some(1)), date("2024-03-15")).await.unwrap();
        let after = repo.insert(&submission("after", Some(1)), date("2024-03-16")).await.unwrap();

        let ids: Vec<i64> = repo
            .list_by_date_range(Some("2024-03-10"), Some("2024-03-15"))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();

        assert_eq!(ids, vec![first, middle, last]);
        assert!(!ids.contains(&before));
        assert!(!ids.contains(&after));
    }

    #[tokio::test]
    async fn single_day_range_returns_that_day_only() {
        let (_, repo) = setup().await;

        repo.insert(&submission("mon", Some(1)), date("2024-03-11")).await.unwrap();
        let tue = repo.insert(&submission("tue", Some(1)), date("2024-03-12")).await.unwrap();
        repo.insert(&submission("wed", Some(1)), date("2024-03-13")).await.unwrap();

        let rows = repo
            .list_by_date_range(Some("2024-03-12"), Some("2024-03-12T23:59:59"))
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, tue);
        assert_eq!(rows[0].analyst_name.as_deref(), Some("Ana Souza"));
        assert_eq!(rows[0].creation_date, date("2024-03-12"));
    }

    #[tokio::test]
    async fn range_skips_proposals_without_a_known_analyst() {
        let (_, repo) = setup().await;

        let kept = repo.insert(&submission("kept", Some(1)), date("2024-03-12")).await.unwrap();
        repo.insert(&submission("dangling", Some(77)), date("2024-03-12")).await.unwrap();
        repo.insert(&submission("unassigned", None), date("2024-03-12")).await.unwrap();

        let rows = repo
            .list_by_date_range(Some("2024-03-01"), Some("2024-03-31"))
            .await
            .unwrap();

        assert_eq!(rows.iter().map(|p| p.id).collect::<Vec<_>>(), vec![kept]);
    }

    #[tokio::test]
    async fn range_requires_both_bounds() {
        let (_, repo) = setup().await;

        for (start, end) in [(None, Some("2024-01-01")), (Some("2024-01-01"), None), (None, None)] {
            let err = repo.list_by_date_range(start, end).await.unwrap_err();
            assert!(matches!(err, DatabaseError::InvalidArgument(_)));
        }
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let (_, repo) = setup().await;
        let id = repo.create(&submission("joao", Some(1))).await.unwrap();
        let original = repo.get_by_id(id).await.unwrap().unwrap();

        let replacement = ProposalFields {
            name: Some("João Silva".to_string()),
            contract_type: Some("consórcio".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.update(id, &replacement).await.unwrap(), 1);

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.fields, replacement);
        // email and installments were omitted, so they are cleared
        assert_eq!(stored.fields.email, None);
        assert_eq!(stored.fields.installments, None);
        assert_eq!(stored.analyst_id, original.analyst_id);
        assert_eq!(stored.creation_date, original.creation_date);
    }

    #[tokio::test]
    async fn update_and_delete_report_zero_for_missing_rows() {
        let (_, repo) = setup().await;

        assert_eq!(repo.update(9999, &ProposalFields::default()).await.unwrap(), 0);
        assert_eq!(repo.delete(9999).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_removes_the_row_once() {
        let (_, repo) = setup().await;
        let id = repo.create(&submission("gone", Some(1))).await.unwrap();

        assert_eq!(repo.delete(id).await.unwrap(), 1);
        assert!(repo.get_by_id(id).await.unwrap().is_none());
        assert_eq!(repo.delete(id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn storage_failure_surfaces_as_sqlx_error() {
        let (pool, repo) = setup().await;
        sqlx::query("DROP TABLE proposals").execute(&pool).await.unwrap();

        let err = repo.get_by_id(1).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Sqlx(_)));
    }

    #[test]
    fn normalizes_dates_and_timestamps() {
        assert_eq!(normalize_date("2024-02-29").unwrap(), date("2024-02-29"));
        assert_eq!(normalize_date(" 2024-02-29 ").unwrap(), date("2024-02-29"));
        assert_eq!(normalize_date("2024-02-29T10:15:00Z").unwrap(), date("2024-02-29"));
        assert_eq!(normalize_date("2024-02-29T08:00:00").unwrap(), date("2024-02-29"));
        assert_eq!(normalize_date("2024-02-29 08:00:00").unwrap(), date("2024-02-29"));
        assert_eq!(normalize_date("2024-02-29 23:59:59.250").unwrap(), date("2024-02-29"));
    }

    #[test]
    fn offset_timestamps_keep_their_own_calendar_date() {
        assert_eq!(normalize_date("2024-02-29T23:30:00-03:00").unwrap(), date("2024-02-29"));
        assert_eq!(normalize_date("2024-03-01T00:30:00+02:00").unwrap(), date("2024-03-01"));
    }

    #[test]
    fn rejects_non_dates() {
        for raw in ["", "yesterday", "2024-02-30", "29/02/2024"] {
            assert!(matches!(normalize_date(raw), Err(DatabaseError::InvalidArgument(_))));
        }
    }
}
