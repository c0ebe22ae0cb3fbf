use std::process::ExitCode;

use sqlx::PgPool;
use swab_bot::{bot, config::Settings, db};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting swab-bot v{}", env!("CARGO_PKG_VERSION"));

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pool = match connect(&settings.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match bot::framework::run(settings, pool).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Bot stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = db::create_pool(database_url).await?;
    db::run_migrations(&pool).await?;
    Ok(pool)
}
