use std::collections::HashMap;

use sqlx::PgPool;
use tracing::info;

use super::ledger::{rank_weekly, LedgerEntry};

use crate::bot::error::Error;
use crate::constants::timeouts::leaderboard_limit;
use crate::db::models::{ClanMember, WeeklyKillRecord};
use crate::db::queries::{clan_member, weekly_kill};
use crate::utils::formatting::format_number;

/// Zero the weekly counters. Returns how many records changed.
pub async fn reset_weekly(pool: &PgPool) -> Result<u64, Error> {
    let changed = weekly_kill::reset_all(pool).await?;
    info!("Weekly kill reset changed {} records", changed);
    Ok(changed)
}

/// Weekly kill standings for `limit` (clamped) players
pub async fn weekly_standings(
    pool: &PgPool,
    limit: Option<i64>,
) -> Result<Vec<WeeklyKillRecord>, Error> {
    let records = weekly_kill::all(pool).await?;
    Ok(standings(records, leaderboard_limit(limit) as usize))
}

/// Order records with the ledger's ranking
fn standings(records: Vec<WeeklyKillRecord>, limit: usize) -> Vec<WeeklyKillRecord> {
    let rows = records
        .iter()
        .map(|r| {
            let entry = LedgerEntry {
                weekly_kills: r.weekly_kills,
                last_total_kills_seen: r.last_total_kills_seen,
            };
            (r.username_key.clone(), entry)
        })
        .collect();

    let mut by_key: HashMap<String, WeeklyKillRecord> = records
        .into_iter()
        .map(|r| (r.username_key.clone(), r))
        .collect();

    rank_weekly(rows, limit)
        .into_iter()
        .filter_map(|(key, _)| by_key.remove(&key))
        .collect()
}

/// Lifetime kill leaderboard of the clan roster
pub async fn top_killers(pool: &PgPool, limit: Option<i64>) -> Result<Vec<ClanMember>, Error> {
    Ok(clan_member::top_by_kills(pool, leaderboard_limit(limit)).await?)
}

pub fn weekly_rows(records: &[WeeklyKillRecord]) -> Vec<(String, String)> {
    records
        .iter()
        .map(|r| (r.username.clone(), kills_label(r.weekly_kills)))
        .collect()
}

pub fn killer_rows(members: &[ClanMember]) -> Vec<(String, String)> {
    members
        .iter()
        .map(|m| (m.username.clone(), kills_label(m.kills)))
        .collect()
}

fn kills_label(kills: i64) -> String {
    if kills == 1 {
        "1 kill".to_string()
    } else {
        format!("{} kills", format_number(kills))
    }
}
