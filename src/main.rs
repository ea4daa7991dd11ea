use clap::Parser;
use tracing_subscriber::EnvFilter;

use hhload::config::Config;
use hhload::pipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hhload=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    tracing::info!(
        "Collecting employers for {} keywords into '{}'",
        config.keywords.len(),
        config.database_name
    );
    pipeline::run(&config).await?;
    tracing::info!("Done");

    Ok(())
}
