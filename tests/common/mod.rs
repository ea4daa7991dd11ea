//! Postgres container harness for the database tests.
//!
//! Every test gets its own container. Run with:
//! `cargo test -- --ignored` (needs a Docker daemon).

use anyhow::{Context, Result};
use hhload::config::DbConfig;
use hhload::db;
use hhload::models::employer::EmployerRecord;
use hhload::models::vacancy::VacancyRecord;
use sqlx::PgPool;
use testcontainers::ContainerAsync;
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;

pub const DATABASE: &str = "hh_vacancies_test";

pub struct TestDb {
    pub db: DbConfig,
    // Keeps the container alive for the duration of the test
    _postgres: ContainerAsync<Postgres>,
}

impl TestDb {
    pub async fn start() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let db = DbConfig {
            host: postgres.get_host().await?.to_string(),
            port: postgres.get_host_port_ipv4(5432).await?,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            admin_database: "postgres".to_string(),
        };

        Ok(Self {
            db,
            _postgres: postgres,
        })
    }

    /// Reset the test database and open a pool on it.
    pub async fn fresh_pool(&self) -> Result<PgPool> {
        db::reset_database(&self.db, DATABASE).await?;
        Ok(db::create_pool(&self.db, DATABASE).await?)
    }
}

pub fn employer(id: &str, name: &str, open: i32) -> EmployerRecord {
    EmployerRecord {
        employer_id: id.to_string(),
        employer_name: name.to_string(),
        employer_url: format!("https://hh.ru/employer/{id}"),
        employer_open_vacancies: open,
    }
}

pub fn vacancy(id: &str, name: &str, employer: &str, salary_from: i32) -> VacancyRecord {
    VacancyRecord {
        vacancy_id: id.to_string(),
        vacancy_name: name.to_string(),
        vacancy_employer: employer.to_string(),
        vacancy_salary_from: salary_from,
        vacancy_salary_to: 0,
        vacancy_area: "Москва".to_string(),
        vacancy_url: format!("https://hh.ru/vacancy/{id}"),
    }
}
