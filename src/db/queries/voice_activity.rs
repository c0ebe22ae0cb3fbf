use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::db::models::VoiceActivity;
use crate::services::voice::WeekKey;

/// Fetch a user's session row for update, creating it idle if absent. Holds
/// the row lock until the transaction ends.
pub async fn lock_or_create(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    guild_id: i64,
) -> Result<VoiceActivity, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO voice_activity (user_id, guild_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, guild_id) DO NOTHING
        "#
    )
    .bind(user_id)
    .bind(guild_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query_as::<_, VoiceActivity>(
        "SELECT * FROM voice_activity WHERE user_id = $1 AND guild_id = $2 FOR UPDATE"
    )
    .bind(user_id)
    .bind(guild_id)
    .fetch_one(&mut **tx)
    .await
}

pub async fn save_session(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    guild_id: i64,
    joined_at: Option<DateTime<Utc>>,
    last_event_at: Option<DateTime<Utc>>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE voice_activity
        SET joined_at = $3, last_event_at = $4
        WHERE user_id = $1 AND guild_id = $2
        "#
    )
    .bind(user_id)
    .bind(guild_id)
    .bind(joined_at)
    .bind(last_event_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Add closed-session time to a week's total
pub async fn credit_week(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    guild_id: i64,
    week: WeekKey,
    millis: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO voice_weekly_totals (user_id, guild_id, iso_year, iso_week, millis)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, guild_id, iso_year, iso_week)
        DO UPDATE SET millis = voice_weekly_totals.millis + EXCLUDED.millis
        "#
    )
    .bind(user_id)
    .bind(guild_id)
    .bind(week.year)
    .bind(week.week as i32)
    .bind(millis)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn get(
    pool: &PgPool,
    user_id: i64,
    guild_id: i64,
) -> Result<Option<VoiceActivity>, sqlx::Error> {
    sqlx::query_as::<_, VoiceActivity>(
        "SELECT * FROM voice_activity WHERE user_id = $1 AND guild_id = $2"
    )
    .bind(user_id)
    .bind(guild_id)
    .fetch_optional(pool)
    .await
}

pub async fn weekly_total(
    pool: &PgPool,
    user_id: i64,
    guild_id: i64,
    week: WeekKey,
) -> Result<i64, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT millis FROM voice_weekly_totals
        WHERE user_id = $1 AND guild_id = $2 AND iso_year = $3 AND iso_week = $4
        "#
    )
    .bind(user_id)
    .bind(guild_id)
    .bind(week.year)
    .bind(week.week as i32)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.0).unwrap_or(0))
}

/// Every user of a guild with credited time this week or an open session:
/// `(user_id, stored millis, joined_at)`
pub async fn guild_week_rows(
    pool: &PgPool,
    guild_id: i64,
    week: WeekKey,
) -> Result<Vec<(i64, i64, Option<DateTime<Utc>>)>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT a.user_id, COALESCE(t.millis, 0), a.joined_at
        FROM voice_activity a
        LEFT JOIN voice_weekly_totals t
            ON t.user_id = a.user_id
            AND t.guild_id = a.guild_id
            AND t.iso_year = $2
            AND t.iso_week = $3
        WHERE a.guild_id = $1
            AND (t.millis IS NOT NULL OR a.joined_at IS NOT NULL)
        "#
    )
    .bind(guild_id)
    .bind(week.year)
    .bind(week.week as i32)
    .fetch_all(pool)
    .await
}

/// `(user_id, guild_id)` of every open session, optionally limited to one guild
pub async fn open_sessions(
    pool: &PgPool,
    guild_id: Option<i64>,
) -> Result<Vec<(i64, i64)>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT user_id, guild_id FROM voice_activity
        WHERE joined_at IS NOT NULL AND ($1::BIGINT IS NULL OR guild_id = $1)
        "#
    )
    .bind(guild_id)
    .fetch_all(pool)
    .await
}
