use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use super::session::{project_weekly_ms, ChannelKind, Outcome, VoiceEvent, VoiceSession};
use super::week::WeekKey;
use crate::bot::error::Error;
use crate::config::Settings;
use crate::db::queries::voice_activity;

/// Classify a voice channel for accounting (`None` = not in voice)
pub fn classify_channel(settings: &Settings, channel_id: Option<u64>) -> Option<ChannelKind> {
    channel_id.map(|id| {
        if settings.is_tracked_voice_channel(id) {
            ChannelKind::Tracked
        } else {
            ChannelKind::Ignored
        }
    })
}

/// Apply one event to a user's session. The row is locked for the whole
/// read-modify-write and the event is stamped only once the lock is held,
/// so racing events for the same user apply in commit order.
pub async fn record_event(
    pool: &PgPool,
    user_id: u64,
    guild_id: u64,
    event: VoiceEvent,
) -> Result<Outcome, Error> {
    let (user_id, guild_id) = (user_id as i64, guild_id as i64);
    let mut tx = pool.begin().await?;

    let record = voice_activity::lock_or_create(&mut tx, user_id, guild_id).await?;
    let now = Utc::now();
    let mut session = VoiceSession {
        joined_at: record.joined_at,
        last_event_at: record.last_event_at,
    };

    let outcome = session.apply(event, now);
    match outcome {
        Outcome::Stale => {
            debug!("Ignoring stale voice event {:?} for user {}", event, user_id);
            tx.rollback().await?;
            return Ok(outcome);
        }
        Outcome::Applied(credit) => {
            if let Some(credit) = credit.filter(|c| c.millis > 0) {
                voice_activity::credit_week(&mut tx, user_id, guild_id, credit.week, credit.millis)
                    .await?;
                debug!(
                    "Credited {}ms of voice time to user {} for {}",
                    credit.millis, user_id, credit.week
                );
            }
            voice_activity::save_session(
                &mut tx,
                user_id,
                guild_id,
                session.joined_at,
                session.last_event_at,
            )
            .await?;
        }
    }

    tx.commit().await?;
    Ok(outcome)
}

/// Voice time this week, including a still-open session
pub async fn current_weekly_ms(
    pool: &PgPool,
    user_id: u64,
    guild_id: u64,
    now: DateTime<Utc>,
) -> Result<i64, Error> {
    let week = WeekKey::of(now);
    let stored = voice_activity::weekly_total(pool, user_id as i64, guild_id as i64, week).await?;
    let joined_at = voice_activity::get(pool, user_id as i64, guild_id as i64)
        .await?
        .and_then(|r| r.joined_at);

    Ok(project_weekly_ms(stored, joined_at, now))
}

/// Guild leaderboard for the current week: `(user_id, millis)`
pub async fn top_voice(
    pool: &PgPool,
    guild_id: u64,
    now: DateTime<Utc>,
    limit: usize,
) -> Result<Vec<(u64, i64)>, Error> {
    let rows = voice_activity::guild_week_rows(pool, guild_id as i64, WeekKey::of(now)).await?;

    let projected = rows
        .into_iter()
        .map(|(user_id, stored, joined_at)| (user_id as u64, project_weekly_ms(stored, joined_at, now)))
        .collect();

    Ok(rank_voice(projected, limit))
}

/// Most time first, ties by user id; zero rows dropped
fn rank_voice(mut rows: Vec<(u64, i64)>, limit: usize) -> Vec<(u64, i64)> {
    rows.retain(|(_, millis)| *millis > 0);
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    rows.truncate(limit);
    rows
}

/// Credit every open session up to now and keep it open
pub async fn checkpoint_open_sessions(pool: &PgPool) -> Result<usize, Error> {
    let open = voice_activity::open_sessions(pool, None).await?;
    let mut credited = 0;

    for (user_id, guild_id) in open {
        let outcome =
            record_event(pool, user_id as u64, guild_id as u64, VoiceEvent::Checkpoint).await?;
        if matches!(outcome, Outcome::Applied(Some(_))) {
            credited += 1;
        }
    }

    Ok(credited)
}

/// Bring stored sessions of a guild in line with who is actually in voice.
/// `present` maps user id to the kind of channel they currently sit in.
pub async fn reconcile_guild(
    pool: &PgPool,
    guild_id: u64,
    present: &HashMap<u64, ChannelKind>,
) -> Result<usize, Error> {
    let mut touched = 0;

    for (user_id, _) in voice_activity::open_sessions(pool, Some(guild_id as i64)).await? {
        let user_id = user_id as u64;
        if present.get(&user_id) != Some(&ChannelKind::Tracked) {
            record_event(pool, user_id, guild_id, VoiceEvent::Observed(None)).await?;
            touched += 1;
        }
    }

    for (user_id, kind) in present {
        if *kind == ChannelKind::Tracked {
            record_event(pool, *user_id, guild_id, VoiceEvent::Observed(Some(*kind))).await?;
            touched += 1;
        }
    }

    Ok(touched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_voice_orders_and_breaks_ties() {
        let ranked = rank_voice(vec![(30, 500), (10, 900), (20, 500), (40, 0)], 10);
        assert_eq!(ranked, vec![(10, 900), (20, 500), (30, 500)]);
    }

    #[test]
    fn test_rank_voice_limit() {
        let ranked = rank_voice(vec![(1, 3), (2, 2), (3, 1)], 2);
        assert_eq!(ranked, vec![(1, 3), (2, 2)]);
    }
}
