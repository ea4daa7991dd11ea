use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{required_id, required_str};

/// Flat vacancy row. `vacancy_employer` is stored in the `employer_name` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VacancyRecord {
    pub vacancy_id: String,
    pub vacancy_name: String,
    pub vacancy_employer: String,
    pub vacancy_salary_from: i32,
    pub vacancy_salary_to: i32,
    pub vacancy_area: String,
    pub vacancy_url: String,
}

impl VacancyRecord {
    /// Flatten a raw vacancy from an employer's vacancy feed.
    ///
    /// Salary bounds fall back to `0` when the salary object or the bound is
    /// absent, null, or anything other than an integer. Every other field is
    /// required.
    pub fn from_raw(raw: &Value) -> Result<VacancyRecord, AppError> {
        Ok(VacancyRecord {
            vacancy_id: required_id(raw, "vacancy")?,
            vacancy_name: required_str(raw, &["name"], "vacancy", "name")?,
            vacancy_employer: required_str(raw, &["employer", "name"], "vacancy", "employer.name")?,
            vacancy_salary_from: salary_bound(raw, "from"),
            vacancy_salary_to: salary_bound(raw, "to"),
            vacancy_area: required_str(raw, &["area", "name"], "vacancy", "area.name")?,
            vacancy_url: required_str(raw, &["alternate_url"], "vacancy", "alternate_url")?,
        })
    }

    /// Insert every record in order inside one transaction.
    ///
    /// Each `vacancy_employer` must already be committed in `employers`.
    pub async fn insert_all(pool: &PgPool, records: &[VacancyRecord]) -> Result<u64, AppError> {
        let mut tx = pool.begin().await?;
        let mut written = 0;
        for record in records {
            written += sqlx::query(
                "INSERT INTO vacancies (vacancy_id, vacancy_name, employer_name, vacancy_salary_from, vacancy_salary_to, vacancy_area, vacancy_url) VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(&record.vacancy_id)
            .bind(&record.vacancy_name)
            .bind(&record.vacancy_employer)
            .bind(record.vacancy_salary_from)
            .bind(record.vacancy_salary_to)
            .bind(&record.vacancy_area)
            .bind(&record.vacancy_url)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, AppError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vacancies")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}

/// Normalize a whole raw vacancy collection, failing on the first bad record.
pub fn normalize_all(raw: &[Value]) -> Result<Vec<VacancyRecord>, AppError> {
    raw.iter().map(VacancyRecord::from_raw).collect()
}

fn salary_bound(raw: &Value, bound: &str) -> i32 {
    raw.get("salary")
        .and_then(|salary| salary.get(bound))
        .and_then(Value::as_i64)
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(0)
}
