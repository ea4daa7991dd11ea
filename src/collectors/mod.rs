// Collectors fetch raw employer and vacancy objects from the recruitment API.

pub mod hh;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;

/// Page size used for every employer search.
pub const PER_PAGE: u32 = 10;

/// Read access to the recruitment API. Items are returned exactly as the API
/// sent them so they can be checkpointed before normalization.
#[async_trait]
pub trait RecruitmentApi: Send + Sync {
    /// First page of employers matching `keyword`.
    async fn search_employers(&self, keyword: &str) -> Result<Vec<Value>, AppError>;

    /// First page of an employer's vacancy feed.
    async fn employer_vacancies(&self, vacancies_url: &str) -> Result<Vec<Value>, AppError>;
}

/// Search every keyword in order and keep employers with at least one open vacancy.
pub async fn collect_employers(
    api: &dyn RecruitmentApi,
    keywords: &[String],
) -> Result<Vec<Value>, AppError> {
    let mut employers = Vec::new();
    for keyword in keywords {
        let found = api.search_employers(keyword).await?;
        let total = found.len();
        let before = employers.len();
        employers.extend(found.into_iter().filter(has_open_vacancies));
        tracing::info!(
            "Keyword '{keyword}': {total} employers found, {} with open vacancies",
            employers.len() - before
        );
    }
    Ok(employers)
}

/// Fetch the vacancy feed of every employer, in employer order.
pub async fn collect_vacancies(
    api: &dyn RecruitmentApi,
    employers: &[Value],
) -> Result<Vec<Value>, AppError> {
    let mut vacancies = Vec::new();
    for employer in employers {
        let url = employer
            .get("vacancies_url")
            .and_then(Value::as_str)
            .ok_or(AppError::MissingField {
                record: "employer",
                field: "vacancies_url",
            })?;
        let feed = api.employer_vacancies(url).await?;
        tracing::debug!("{} vacancies from {url}", feed.len());
        vacancies.extend(feed);
    }
    Ok(vacancies)
}

fn has_open_vacancies(employer: &Value) -> bool {
    employer
        .get("open_vacancies")
        .and_then(Value::as_i64)
        .is_some_and(|open| open > 0)
}
