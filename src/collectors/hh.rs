use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::collectors::{PER_PAGE, RecruitmentApi};
use crate::error::AppError;

/// reqwest-backed client for the hh.ru public API.
pub struct HhClient {
    client: reqwest::Client,
    base_url: String,
}

impl HhClient {
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<HhClient, AppError> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(HhClient {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_items(&self, request: reqwest::RequestBuilder) -> Result<Vec<Value>, AppError> {
        let resp = request
            .header("Accept", "application/json")
            .send()
            .await?;

        let url = resp.url().to_string();
        if !resp.status().is_success() {
            return Err(AppError::Api {
                status: resp.status(),
                url,
            });
        }

        let data: Value = resp
            .json()
            .await
            .map_err(|e| AppError::MalformedResponse {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        parse_items(data, &url)
    }
}

#[async_trait]
impl RecruitmentApi for HhClient {
    async fn search_employers(&self, keyword: &str) -> Result<Vec<Value>, AppError> {
        let url = format!("{}/employers", self.base_url);
        tracing::debug!("Searching employers for '{keyword}'");
        let request = self.client.get(&url).query(&[
            ("text", keyword.to_string()),
            ("per_page", PER_PAGE.to_string()),
            ("page", "0".to_string()),
        ]);
        self.get_items(request).await
    }

    async fn employer_vacancies(&self, vacancies_url: &str) -> Result<Vec<Value>, AppError> {
        tracing::debug!("Fetching vacancy feed {vacancies_url}");
        self.get_items(self.client.get(vacancies_url)).await
    }
}

/// Take the `items` array out of an API response body.
fn parse_items(data: Value, url: &str) -> Result<Vec<Value>, AppError> {
    match data {
        Value::Object(mut body) => match body.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(AppError::MalformedResponse {
                url: url.to_string(),
                reason: "missing 'items' array".to_string(),
            }),
        },
        _ => Err(AppError::MalformedResponse {
            url: url.to_string(),
            reason: "expected a JSON object".to_string(),
        }),
    }
}
