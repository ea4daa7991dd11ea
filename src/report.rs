use std::fmt::Write as _;

use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::vacancy::VacancyRecord;

/// Zero-excluding mean of the lower salary bound, shared by the average and
/// above-average reports.
const AVERAGE_SALARY: &str =
    "SELECT AVG(vacancy_salary_from)::float8 FROM vacancies WHERE vacancy_salary_from > 0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CompanyVacancyCount {
    pub employer_name: String,
    pub employer_open_vacancies: i32,
    pub loaded_vacancies: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct VacancyListing {
    pub employer_name: String,
    pub vacancy_name: String,
    pub vacancy_salary_from: i32,
    pub vacancy_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct VacancySalary {
    pub vacancy_name: String,
    pub vacancy_salary_from: i32,
}

/// Every employer with its advertised open-vacancy count and the number of
/// vacancies actually loaded for it.
pub async fn companies_and_vacancy_counts(
    pool: &PgPool,
) -> Result<Vec<CompanyVacancyCount>, AppError> {
    let rows = sqlx::query_as::<_, CompanyVacancyCount>(
        "SELECT e.employer_name, e.employer_open_vacancies, COUNT(v.vacancy_id) AS loaded_vacancies
         FROM employers e
         LEFT JOIN vacancies v ON v.employer_name = e.employer_name
         GROUP BY e.employer_name, e.employer_open_vacancies
         ORDER BY e.employer_name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn all_vacancies(pool: &PgPool) -> Result<Vec<VacancyListing>, AppError> {
    let rows = sqlx::query_as::<_, VacancyListing>(
        "SELECT employer_name, vacancy_name, vacancy_salary_from, vacancy_url
         FROM vacancies
         ORDER BY employer_name, vacancy_name, vacancy_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Mean lower salary bound over vacancies with a known salary, `None` when there are none.
pub async fn average_salary(pool: &PgPool) -> Result<Option<f64>, AppError> {
    let row: (Option<f64>,) = sqlx::query_as(AVERAGE_SALARY).fetch_one(pool).await?;
    Ok(row.0)
}

pub async fn vacancies_above_average(pool: &PgPool) -> Result<Vec<VacancySalary>, AppError> {
    let sql = format!(
        "SELECT vacancy_name, vacancy_salary_from FROM vacancies
         WHERE vacancy_salary_from > ({AVERAGE_SALARY})
         ORDER BY vacancy_salary_from DESC, vacancy_name"
    );
    let rows = sqlx::query_as::<_, VacancySalary>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Vacancies whose title contains `word`, ignoring case.
pub async fn vacancies_by_keyword(
    pool: &PgPool,
    word: &str,
) -> Result<Vec<VacancyRecord>, AppError> {
    let rows = sqlx::query_as::<_, VacancyRecord>(
        "SELECT vacancy_id, vacancy_name, employer_name AS vacancy_employer, vacancy_salary_from,
                vacancy_salary_to, vacancy_area, vacancy_url
         FROM vacancies
         WHERE vacancy_name ILIKE '%' || $1 || '%' ESCAPE '\\'
         ORDER BY vacancy_name, vacancy_id",
    )
    .bind(escape_like(word))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Make `%`, `_` and `\` match literally inside a LIKE pattern.
fn escape_like(word: &str) -> String {
    let mut escaped = String::with_capacity(word.len());
    for c in word.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Run all five reports and render them as labeled text blocks.
pub async fn render_all(pool: &PgPool, keyword: &str) -> Result<String, AppError> {
    let mut out = String::new();

    let companies = companies_and_vacancy_counts(pool).await?;
    block(&mut out, "Companies and open vacancies", companies.len());
    for c in &companies {
        let _ = writeln!(
            out,
            "{}: {} open, {} loaded",
            c.employer_name, c.employer_open_vacancies, c.loaded_vacancies
        );
    }

    let vacancies = all_vacancies(pool).await?;
    block(&mut out, "All vacancies", vacancies.len());
    for v in &vacancies {
        let _ = writeln!(
            out,
            "{} | {} | {} | {}",
            v.employer_name,
            v.vacancy_name,
            salary(v.vacancy_salary_from),
            v.vacancy_url
        );
    }

    let average = average_salary(pool).await?;
    let _ = writeln!(out, "\n== Average salary ==");
    match average {
        Some(avg) => {
            let _ = writeln!(out, "{avg:.2}");
        }
        None => {
            let _ = writeln!(out, "n/a");
        }
    }

    let above = vacancies_above_average(pool).await?;
    block(&mut out, "Vacancies above average salary", above.len());
    for v in &above {
        let _ = writeln!(out, "{}: {}", v.vacancy_name, v.vacancy_salary_from);
    }

    let matched = vacancies_by_keyword(pool, keyword).await?;
    block(
        &mut out,
        &format!("Vacancies matching '{keyword}'"),
        matched.len(),
    );
    for v in &matched {
        let _ = writeln!(
            out,
            "{} | {} | {} | {}-{} | {} | {}",
            v.vacancy_id,
            v.vacancy_name,
            v.vacancy_employer,
            salary(v.vacancy_salary_from),
            salary(v.vacancy_salary_to),
            v.vacancy_area,
            v.vacancy_url
        );
    }

    Ok(out)
}

fn block(out: &mut String, title: &str, rows: usize) {
    let _ = writeln!(out, "\n== {title} ({rows}) ==");
}

/// The stored `0` means the bound is unknown.
fn salary(value: i32) -> String {
    if value > 0 {
        value.to_string()
    } else {
        "-".to_string()
    }
}
