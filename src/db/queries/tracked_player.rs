use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::TrackedPlayer;
use crate::services::roat::PlayerStats;

/// Insert a baseline. The unique index on `username_key` rejects a second
/// baseline for the same player regardless of case.
pub async fn create(
    pool: &PgPool,
    username_key: &str,
    username: &str,
    stats: &PlayerStats,
    approver: &str,
) -> Result<TrackedPlayer, sqlx::Error> {
    sqlx::query_as::<_, TrackedPlayer>(
        r#"
        INSERT INTO tracked_players
            (id, username, username_key, kills, deaths, elo, jad_kills, skotizo_kills, approver)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(username_key)
    .bind(stats.kills)
    .bind(stats.deaths)
    .bind(stats.elo)
    .bind(stats.jad_kills)
    .bind(stats.skotizo_kills)
    .bind(approver)
    .fetch_one(pool)
    .await
}

pub async fn find(pool: &PgPool, username_key: &str) -> Result<Option<TrackedPlayer>, sqlx::Error> {
    sqlx::query_as::<_, TrackedPlayer>("SELECT * FROM tracked_players WHERE username_key = $1")
        .bind(username_key)
        .fetch_optional(pool)
        .await
}
