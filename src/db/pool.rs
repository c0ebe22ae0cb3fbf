use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{debug, info};

/// Embedded schema, applied in order on every start
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_tracked_players",
        include_str!("../../migrations/001_tracked_players.sql"),
    ),
    (
        "002_clan_members",
        include_str!("../../migrations/002_clan_members.sql"),
    ),
    (
        "003_weekly_kills",
        include_str!("../../migrations/003_weekly_kills.sql"),
    ),
    (
        "004_voice_activity",
        include_str!("../../migrations/004_voice_activity.sql"),
    ),
    (
        "005_ban_links_watermarks",
        include_str!("../../migrations/005_ban_links_watermarks.sql"),
    ),
];

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await?;

    info!("Database connection established");

    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Running {} database migrations...", MIGRATIONS.len());

    for (name, sql) in MIGRATIONS {
        debug!("Applying migration {}", name);

        for statement in split_statements(sql) {
            if let Err(e) = sqlx::query(statement).execute(pool).await {
                if !is_already_applied(&e) {
                    return Err(e);
                }
            }
        }
    }

    info!("Migrations completed successfully");
    Ok(())
}

/// Split a migration file into executable statements. Statements must not
/// contain semicolons of their own.
fn split_statements(sql: &str) -> impl Iterator<Item = &str> {
    sql.split(';')
        .map(str::trim)
        .filter(|statement| statement.lines().any(|line| !is_comment_or_blank(line)))
}

fn is_comment_or_blank(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with("--")
}

/// Schema objects are created with IF NOT EXISTS; this covers concurrent starts
fn is_already_applied(err: &sqlx::Error) -> bool {
    let message = err.to_string();
    message.contains("already exists") || message.contains("duplicate key")
}
