use sqlx::PgPool;

use crate::db::models::ClanMember;
use crate::services::roat::PlayerStats;

pub async fn upsert(
    pool: &PgPool,
    username_key: &str,
    stats: &PlayerStats,
) -> Result<ClanMember, sqlx::Error> {
    sqlx::query_as::<_, ClanMember>(
        r#"
        INSERT INTO clan_members
            (username_key, username, rank_name, kills, deaths, elo, donator_rank, game_mode, last_seen)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (username_key)
        DO UPDATE SET
            username = EXCLUDED.username,
            rank_name = EXCLUDED.rank_name,
            kills = EXCLUDED.kills,
            deaths = EXCLUDED.deaths,
            elo = EXCLUDED.elo,
            donator_rank = EXCLUDED.donator_rank,
            game_mode = EXCLUDED.game_mode,
            last_seen = EXCLUDED.last_seen,
            updated_at = NOW()
        RETURNING *
        "#
    )
    .bind(username_key)
    .bind(&stats.username)
    .bind(&stats.clan_rank_name)
    .bind(stats.kills)
    .bind(stats.deaths)
    .bind(stats.elo)
    .bind(stats.donator_rank)
    .bind(&stats.game_mode)
    .bind(&stats.last_seen)
    .fetch_one(pool)
    .await
}

/// Lifetime kill leaderboard, ties by username
pub async fn top_by_kills(pool: &PgPool, limit: i64) -> Result<Vec<ClanMember>, sqlx::Error> {
    sqlx::query_as::<_, ClanMember>(
        r#"
        SELECT * FROM clan_members
        ORDER BY kills DESC, username_key ASC
        LIMIT $1
        "#
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
