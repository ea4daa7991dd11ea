use anyhow::Context;
use serde_json::Value;
use sqlx::PgPool;

use crate::checkpoint::{self, Checkpoints};
use crate::collectors::hh::HhClient;
use crate::collectors::{RecruitmentApi, collect_employers, collect_vacancies};
use crate::config::Config;
use crate::error::AppError;
use crate::models::employer::{self, EmployerRecord};
use crate::models::vacancy::{self, VacancyRecord};
use crate::{db, report};

/// Run every stage once: fetch, normalize, reset the database, load, report.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    let checkpoints = Checkpoints::new(&config.data_dir);
    let api = HhClient::new(&config.api_url, &config.user_agent, config.http_timeout())?;

    fetch(&api, &config.keywords, &checkpoints)
        .await
        .context("Fetching employers and vacancies failed")?;
    normalize(&checkpoints).context("Normalizing records failed")?;

    db::reset_database(&config.db, &config.database_name)
        .await
        .with_context(|| format!("Recreating database '{}' failed", config.database_name))?;
    let pool = db::create_pool(&config.db, &config.database_name).await?;

    let (employers, vacancies) = load(&pool, &checkpoints)
        .await
        .context("Loading records into the database failed")?;
    tracing::info!("Loaded {employers} employers and {vacancies} vacancies");

    let output = report::render_all(&pool, &config.report_keyword)
        .await
        .context("Running reports failed")?;
    println!("{output}");

    pool.close().await;
    Ok(())
}

/// Fetch raw employers and their vacancy feeds into the raw checkpoints.
pub async fn fetch(
    api: &dyn RecruitmentApi,
    keywords: &[String],
    checkpoints: &Checkpoints,
) -> Result<(), AppError> {
    let employers = collect_employers(api, keywords).await?;
    checkpoint::save(&employers, &checkpoints.raw_employers())?;

    let employers: Vec<Value> = checkpoint::load(&checkpoints.raw_employers())?;
    let vacancies = collect_vacancies(api, &employers).await?;
    checkpoint::save(&vacancies, &checkpoints.raw_vacancies())?;
    Ok(())
}

/// Flatten both raw checkpoints into the normalized checkpoints.
pub fn normalize(checkpoints: &Checkpoints) -> Result<(), AppError> {
    let raw: Vec<Value> = checkpoint::load(&checkpoints.raw_employers())?;
    checkpoint::save(&employer::normalize_all(&raw)?, &checkpoints.employers_data())?;

    let raw: Vec<Value> = checkpoint::load(&checkpoints.raw_vacancies())?;
    checkpoint::save(&vacancy::normalize_all(&raw)?, &checkpoints.vacancies_data())?;
    Ok(())
}

/// Insert the normalized checkpoints, employers first.
pub async fn load(pool: &PgPool, checkpoints: &Checkpoints) -> Result<(u64, u64), AppError> {
    let employers: Vec<EmployerRecord> = checkpoint::load(&checkpoints.employers_data())?;
    let vacancies: Vec<VacancyRecord> = checkpoint::load(&checkpoints.vacancies_data())?;

    let employers = EmployerRecord::insert_all(pool, &employers).await?;
    let vacancies = VacancyRecord::insert_all(pool, &vacancies).await?;
    Ok((employers, vacancies))
}
