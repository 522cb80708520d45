// src/main.rs
use anyhow::Result;
use job_tracker::{start_web_server, AppConfig};
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("job_tracker=info,rocket=warn")),
        )
        .init();

    let port = std::env::var("ROCKET_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8000);

    let config = AppConfig::from_env();

    info!("Starting Job Tracker API");
    info!("Server: http://0.0.0.0:{}", port);
    if let Some(database_id) = &config.notion_database_id {
        info!("Using Notion DB ID: {}", database_id);
    }

    start_web_server(config, port).await
}
