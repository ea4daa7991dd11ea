use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{required_i32, required_id, required_str};

/// Flat employer row as stored in the `employers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerRecord {
    pub employer_id: String,
    pub employer_name: String,
    pub employer_url: String,
    pub employer_open_vacancies: i32,
}

impl EmployerRecord {
    /// Flatten a raw employer object returned by the employer search endpoint.
    pub fn from_raw(raw: &Value) -> Result<EmployerRecord, AppError> {
        Ok(EmployerRecord {
            employer_id: required_id(raw, "employer")?,
            employer_name: required_str(raw, &["name"], "employer", "name")?,
            employer_url: required_str(raw, &["alternate_url"], "employer", "alternate_url")?,
            employer_open_vacancies: required_i32(raw, "open_vacancies", "employer")?,
        })
    }

    /// Insert every record in order inside one transaction.
    ///
    /// Employer names must be unique across `records`; a duplicate aborts the
    /// whole batch with a unique violation.
    pub async fn insert_all(pool: &PgPool, records: &[EmployerRecord]) -> Result<u64, AppError> {
        let mut tx = pool.begin().await?;
        let mut written = 0;
        for record in records {
            written += sqlx::query(
                "INSERT INTO employers (employer_id, employer_name, employer_url, employer_open_vacancies) VALUES ($1, $2, $3, $4)",
            )
            .bind(&record.employer_id)
            .bind(&record.employer_name)
            .bind(&record.employer_url)
            .bind(record.employer_open_vacancies)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }
}

/// Normalize a whole raw employer collection, failing on the first bad record.
pub fn normalize_all(raw: &[Value]) -> Result<Vec<EmployerRecord>, AppError> {
    raw.iter().map(EmployerRecord::from_raw).collect()
}
