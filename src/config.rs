use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sqlx::postgres::PgConnectOptions;

/// Employers searched when no keywords are configured.
pub const DEFAULT_KEYWORDS: [&str; 10] = [
    "Аптрейд",
    "Точка",
    "АВ Софт",
    "ЭНКОСТ",
    "МКСКОМ",
    "Бизнес-Азимут",
    "Генотек",
    "Creonit",
    "ScanFactory",
    "Фабрика Решений",
];

#[derive(Parser, Debug, Clone)]
#[command(
    name = "hhload",
    about = "Load hh.ru employers and vacancies into PostgreSQL and print reports"
)]
pub struct Config {
    #[command(flatten)]
    pub db: DbConfig,

    /// Name of the database that is dropped and recreated on every run
    #[arg(long, env = "DB_NAME", default_value = "hh_vacancies")]
    pub database_name: String,

    /// Base URL of the recruitment API
    #[arg(long, env = "HH_API_URL", default_value = "https://api.hh.ru")]
    pub api_url: String,

    /// User-Agent sent with every API request
    #[arg(long, env = "HH_USER_AGENT", default_value = "hhload/0.1 (vacancy-loader)")]
    pub user_agent: String,

    /// HTTP request timeout in seconds (no timeout when unset)
    #[arg(long, env = "HTTP_TIMEOUT")]
    pub http_timeout: Option<u64>,

    /// Directory holding the JSON checkpoint files
    #[arg(long, env = "DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Employer search keywords, comma separated
    #[arg(
        long = "keyword",
        env = "KEYWORDS",
        value_delimiter = ',',
        default_values = DEFAULT_KEYWORDS
    )]
    pub keywords: Vec<String>,

    /// Word searched for in vacancy titles by the keyword report
    #[arg(long, env = "REPORT_KEYWORD", default_value = "python")]
    pub report_keyword: String,
}

impl Config {
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout.map(Duration::from_secs)
    }
}

/// PostgreSQL server connection parameters.
#[derive(clap::Args, Debug, Clone)]
pub struct DbConfig {
    /// Database server host
    #[arg(long = "db-host", env = "DB_HOST", default_value = "localhost")]
    pub host: String,

    /// Database server port
    #[arg(long = "db-port", env = "DB_PORT", default_value = "5432")]
    pub port: u16,

    /// Database user
    #[arg(long = "db-user", env = "DB_USER", default_value = "postgres")]
    pub user: String,

    /// Database password
    #[arg(long = "db-password", env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Administrative database used while dropping and creating the target
    #[arg(long = "db-admin-database", env = "DB_ADMIN_DATABASE", default_value = "postgres")]
    pub admin_database: String,
}

impl DbConfig {
    /// Connection options for `database` on the configured server.
    pub fn connect_options(&self, database: &str) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(database)
    }
}
