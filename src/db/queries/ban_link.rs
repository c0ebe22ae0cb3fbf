use sqlx::PgPool;

use crate::db::models::BanLink;

/// Link a Discord user to an in-game name, replacing that user's previous link
pub async fn upsert(
    pool: &PgPool,
    discord_id: i64,
    in_game_name: &str,
    in_game_key: &str,
) -> Result<BanLink, sqlx::Error> {
    sqlx::query_as::<_, BanLink>(
        r#"
        INSERT INTO ban_links (discord_id, in_game_name, in_game_key)
        VALUES ($1, $2, $3)
        ON CONFLICT (discord_id)
        DO UPDATE SET in_game_name = EXCLUDED.in_game_name, in_game_key = EXCLUDED.in_game_key
        RETURNING *
        "#
    )
    .bind(discord_id)
    .bind(in_game_name)
    .bind(in_game_key)
    .fetch_one(pool)
    .await
}

/// Returns true if a link was removed
pub async fn delete_by_in_game_key(pool: &PgPool, in_game_key: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM ban_links WHERE in_game_key = $1")
        .bind(in_game_key)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_by_in_game_keys(
    pool: &PgPool,
    in_game_keys: &[String],
) -> Result<Vec<BanLink>, sqlx::Error> {
    sqlx::query_as::<_, BanLink>("SELECT * FROM ban_links WHERE in_game_key = ANY($1)")
        .bind(in_game_keys)
        .fetch_all(pool)
        .await
}
