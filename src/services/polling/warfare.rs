use tracing::{debug, info};

use super::store::FeedStore;
use crate::bot::error::Error;
use crate::constants::embeds::{BULLET, WARFARE_COLOR};
use crate::services::notify::{Notice, Notifier};
use crate::services::roat::{StatsSource, WarfareResult};

/// Watermark: identity key of the last announced warfare result
pub const WARFARE_WATERMARK: &str = "warfare.last_key";

/// A result is announced when its identity differs from the last one posted
pub fn should_announce(result: &WarfareResult, last_key: Option<&str>) -> bool {
    last_key != Some(result.identity_key().as_str())
}

pub fn warfare_notice(result: &WarfareResult) -> Notice {
    let mut lines = vec![format!("{} Winner: **{}**", BULLET, result.winner_clan)];

    if let Some(loser) = result.loser_clan.as_deref() {
        lines.push(format!("{} Opponent: **{}**", BULLET, loser));
    }

    match (result.winner_kills, result.loser_kills) {
        (Some(won), Some(lost)) => lines.push(format!("{} Score: **{} - {}**", BULLET, won, lost)),
        (Some(won), None) => lines.push(format!("{} Winner kills: **{}**", BULLET, won)),
        _ => {}
    }

    lines.push(format!("{} Total kills: **{}**", BULLET, result.total_kills));
    lines.push(format!("{} Ended: {}", BULLET, result.created_at));

    Notice {
        title: "Clan Warfare Result".to_string(),
        description: lines.join("\n"),
        colour: WARFARE_COLOR,
    }
}

/// One warfare-feed tick. Returns whether a result was announced.
pub async fn run_warfare_check(
    source: &dyn StatsSource,
    store: &dyn FeedStore,
    notifier: &dyn Notifier,
    channel_id: u64,
) -> Result<bool, Error> {
    let Some(result) = source.fetch_warfare_result().await? else {
        debug!("No warfare result available");
        return Ok(false);
    };

    let last_key = store.watermark(WARFARE_WATERMARK).await?;
    if !should_announce(&result, last_key.as_deref()) {
        debug!("Warfare result {} already announced", result.identity_key());
        return Ok(false);
    }

    notifier
        .send(channel_id, &warfare_notice(&result))
        .await
        .map_err(|e| Error::Transient(format!("warfare notification not delivered: {}", e)))?;

    store
        .set_watermark(WARFARE_WATERMARK, &result.identity_key())
        .await?;

    info!(
        "Announced warfare result: {} won with {} total kills",
        result.winner_clan, result.total_kills
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notify::NotifyError;
    use crate::services::polling::testing::{FakeSource, MemoryFeedStore, RecordingNotifier};

    fn result(created_at: &str, total_kills: i64) -> WarfareResult {
        WarfareResult {
            created_at: created_at.to_string(),
            winner_clan: "Swab".to_string(),
            loser_clan: Some("Rivals".to_string()),
            total_kills,
            winner_kills: Some(total_kills - 4),
            loser_kills: Some(4),
        }
    }

    #[test]
    fn test_should_announce() {
        let r = result("2026-01-10T20:00:00Z", 30);
        assert!(should_announce(&r, None));
        assert!(!should_announce(&r, Some(r.identity_key().as_str())));
        assert!(should_announce(&r, Some("2026-01-03T20:00:00Z|Swab|12")));
    }

    #[test]
    fn test_notice_shows_score() {
        let notice = warfare_notice(&result("2026-01-10T20:00:00Z", 30));
        assert!(notice.description.contains("Winner: **Swab**"));
        assert!(notice.description.contains("Opponent: **Rivals**"));
        assert!(notice.description.contains("Score: **26 - 4**"));
        assert!(notice.description.contains("Total kills: **30**"));
    }

    #[tokio::test]
    async fn test_same_result_announced_once() {
        let source = FakeSource::default();
        let store = MemoryFeedStore::default();
        let notifier = RecordingNotifier::default();
        *source.warfare.lock().unwrap() = Some(result("2026-01-10T20:00:00Z", 30));

        assert!(run_warfare_check(&source, &store, &notifier, 7).await.unwrap());
        assert!(!run_warfare_check(&source, &store, &notifier, 7).await.unwrap());
        assert_eq!(notifier.sent().len(), 1);

        *source.warfare.lock().unwrap() = Some(result("2026-01-17T20:00:00Z", 18));
        assert!(run_warfare_check(&source, &store, &notifier, 7).await.unwrap());
        assert_eq!(notifier.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_send_is_retried_next_tick() {
        let source = FakeSource::default();
        let store = MemoryFeedStore::default();
        let notifier = RecordingNotifier::default();
        *source.warfare.lock().unwrap() = Some(result("2026-01-10T20:00:00Z", 30));

        notifier.fail_next(NotifyError::Failed("missing access".to_string()));
        assert!(run_warfare_check(&source, &store, &notifier, 7).await.is_err());
        assert!(store.watermark(WARFARE_WATERMARK).await.unwrap().is_none());

        assert!(run_warfare_check(&source, &store, &notifier, 7).await.unwrap());
    }

    #[tokio::test]
    async fn test_no_result_does_nothing() {
        let source = FakeSource::default();
        let store = MemoryFeedStore::default();
        let notifier = RecordingNotifier::default();

        assert!(!run_warfare_check(&source, &store, &notifier, 7).await.unwrap());
        assert!(notifier.sent().is_empty());
    }
}
