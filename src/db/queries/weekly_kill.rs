use std::collections::{BTreeMap, HashMap};

use sqlx::{PgPool, Postgres, Transaction};

use crate::db::models::WeeklyKillRecord;
use crate::services::weekly::ledger::{plan_reset, LedgerEntry};

/// Fold a live lifetime total into a player's weekly counter. The row is
/// locked for the read-modify-write so concurrent polls cannot lose updates.
pub async fn apply_live_total(
    pool: &PgPool,
    username_key: &str,
    username: &str,
    live_total: i64,
) -> Result<WeeklyKillRecord, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let first = LedgerEntry::first_seen(live_total);
    let created = sqlx::query_as::<_, WeeklyKillRecord>(
        r#"
        INSERT INTO weekly_kills (username_key, username, weekly_kills, last_total_kills_seen)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (username_key) DO NOTHING
        RETURNING *
        "#
    )
    .bind(username_key)
    .bind(username)
    .bind(first.weekly_kills)
    .bind(first.last_total_kills_seen)
    .fetch_optional(&mut *tx)
    .await?;

    if let Some(record) = created {
        tx.commit().await?;
        return Ok(record);
    }

    let current = lock(&mut tx, username_key).await?;
    let next = LedgerEntry {
        weekly_kills: current.weekly_kills,
        last_total_kills_seen: current.last_total_kills_seen,
    }
    .apply_live_total(live_total);

    let record = sqlx::query_as::<_, WeeklyKillRecord>(
        r#"
        UPDATE weekly_kills
        SET weekly_kills = $2, last_total_kills_seen = $3, username = $4, last_updated = NOW()
        WHERE username_key = $1
        RETURNING *
        "#
    )
    .bind(username_key)
    .bind(next.weekly_kills)
    .bind(next.last_total_kills_seen)
    .bind(username)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(record)
}

async fn lock(
    tx: &mut Transaction<'_, Postgres>,
    username_key: &str,
) -> Result<WeeklyKillRecord, sqlx::Error> {
    sqlx::query_as::<_, WeeklyKillRecord>(
        "SELECT * FROM weekly_kills WHERE username_key = $1 FOR UPDATE"
    )
    .bind(username_key)
    .fetch_one(&mut **tx)
    .await
}

/// Zero every weekly counter and pin baselines to the latest known clan
/// member totals. Returns how many records changed; a second call in a row
/// changes nothing.
pub async fn reset_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let counters: Vec<(String, i64, i64)> = sqlx::query_as(
        "SELECT username_key, weekly_kills, last_total_kills_seen FROM weekly_kills FOR UPDATE"
    )
    .fetch_all(&mut *tx)
    .await?;

    let members: Vec<(String, String, i64)> =
        sqlx::query_as("SELECT username_key, username, kills FROM clan_members")
            .fetch_all(&mut *tx)
            .await?;

    let counters: BTreeMap<String, LedgerEntry> = counters
        .into_iter()
        .map(|(key, weekly_kills, last_total_kills_seen)| {
            (
                key,
                LedgerEntry {
                    weekly_kills,
                    last_total_kills_seen,
                },
            )
        })
        .collect();
    let known_totals: BTreeMap<String, i64> = members
        .iter()
        .map(|(key, _, kills)| (key.clone(), *kills))
        .collect();
    let usernames: HashMap<&str, &str> = members
        .iter()
        .map(|(key, username, _)| (key.as_str(), username.as_str()))
        .collect();

    let plan = plan_reset(&counters, &known_totals);
    let changed = plan.len() as u64;

    for (username_key, entry) in plan {
        let username = usernames
            .get(username_key.as_str())
            .copied()
            .unwrap_or(username_key.as_str());

        sqlx::query(
            r#"
            INSERT INTO weekly_kills (username_key, username, weekly_kills, last_total_kills_seen)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username_key)
            DO UPDATE SET
                weekly_kills = EXCLUDED.weekly_kills,
                last_total_kills_seen = EXCLUDED.last_total_kills_seen,
                last_updated = NOW()
            "#
        )
        .bind(&username_key)
        .bind(username)
        .bind(entry.weekly_kills)
        .bind(entry.last_total_kills_seen)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(changed)
}

pub async fn all(pool: &PgPool) -> Result<Vec<WeeklyKillRecord>, sqlx::Error> {
    sqlx::query_as::<_, WeeklyKillRecord>("SELECT * FROM weekly_kills")
        .fetch_all(pool)
        .await
}
