use std::collections::HashMap;

use tracing::{debug, info};

use super::store::FeedStore;
use crate::bot::error::Error;
use crate::constants::embeds::{BAN_COLOR, BULLET};
use crate::services::notify::{Notice, Notifier};
use crate::services::roat::{BanRecord, StatsSource};
use crate::services::tracking::username_key;
use crate::utils::formatting::truncate;

const MAX_REASON_CHARS: usize = 200;

/// Watermark: `banned_at` of the newest ban already announced
pub const BAN_WATERMARK: &str = "bans.last_seen_at";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanDiff {
    /// Bans newer than the watermark, oldest first
    pub new_bans: Vec<BanRecord>,
    /// Watermark after these bans are announced
    pub watermark: Option<i64>,
}

/// Bans strictly newer than the watermark. With no watermark yet, the newest
/// ban becomes the watermark and nothing is reported.
pub fn diff_bans(current: &[BanRecord], watermark: Option<i64>) -> BanDiff {
    let newest = current.iter().map(|b| b.banned_at).max();

    let Some(watermark) = watermark else {
        return BanDiff {
            new_bans: Vec::new(),
            watermark: newest,
        };
    };

    let mut new_bans: Vec<BanRecord> = current
        .iter()
        .filter(|b| b.banned_at > watermark)
        .cloned()
        .collect();
    new_bans.sort_by_key(|b| b.banned_at);

    BanDiff {
        watermark: Some(newest.map_or(watermark, |n| n.max(watermark))),
        new_bans,
    }
}

/// Render a batch of bans, listing at most `limit` of them
pub fn ban_notice(bans: &[BanRecord], links: &HashMap<String, u64>, limit: usize) -> Notice {
    let mut lines: Vec<String> = bans
        .iter()
        .take(limit)
        .map(|ban| {
            let issuer = match ban.banned_by.as_deref() {
                Some(by) => match links.get(&username_key(by)) {
                    Some(discord_id) => format!("<@{}>", discord_id),
                    None => format!("**{}**", by),
                },
                None => "unknown".to_string(),
            };

            let mut line = format!(
                "{} **{}** banned by {} <t:{}:R>",
                BULLET, ban.username, issuer, ban.banned_at
            );
            if let Some(reason) = ban.reason.as_deref().filter(|r| !r.is_empty()) {
                line.push_str(&format!("\n   Reason: {}", truncate(reason, MAX_REASON_CHARS)));
            }
            line
        })
        .collect();

    let omitted = bans.len().saturating_sub(limit);
    if omitted > 0 {
        lines.push(format!("...and {} more", omitted));
    }

    Notice {
        title: if bans.len() == 1 {
            "New clan ban".to_string()
        } else {
            format!("{} new clan bans", bans.len())
        },
        description: lines.join("\n"),
        colour: BAN_COLOR,
    }
}

/// One ban-feed tick. Returns how many bans were announced. The watermark
/// only moves once the notification went out.
pub async fn run_ban_check(
    source: &dyn StatsSource,
    store: &dyn FeedStore,
    notifier: &dyn Notifier,
    channel_id: u64,
    display_limit: usize,
) -> Result<usize, Error> {
    let current = source.fetch_ban_list().await?;

    let watermark = store
        .watermark(BAN_WATERMARK)
        .await?
        .and_then(|raw| raw.parse::<i64>().ok());

    let diff = diff_bans(&current, watermark);

    if diff.new_bans.is_empty() {
        if watermark.is_none() {
            if let Some(initial) = diff.watermark {
                store.set_watermark(BAN_WATERMARK, &initial.to_string()).await?;
                info!("Initialised ban watermark at {}", initial);
            }
        }
        debug!("No new bans");
        return Ok(0);
    }

    let issuers: Vec<String> = diff
        .new_bans
        .iter()
        .filter_map(|b| b.banned_by.clone())
        .collect();
    let links = store.linked_discord_ids(&issuers).await?;

    let notice = ban_notice(&diff.new_bans, &links, display_limit);
    notifier
        .send(channel_id, &notice)
        .await
        .map_err(|e| Error::Transient(format!("ban notification not delivered: {}", e)))?;

    if let Some(next) = diff.watermark {
        store.set_watermark(BAN_WATERMARK, &next.to_string()).await?;
    }

    info!("Announced {} new bans", diff.new_bans.len());
    Ok(diff.new_bans.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notify::NotifyError;
    use crate::services::polling::testing::{ban, FakeSource, MemoryFeedStore, RecordingNotifier};

    const CHANNEL: u64 = 42;

    #[test]
    fn test_diff_without_watermark_adopts_newest() {
        let diff = diff_bans(&[ban("A", "mod", 100), ban("B", "mod", 200)], None);
        assert!(diff.new_bans.is_empty());
        assert_eq!(diff.watermark, Some(200));
    }

    #[test]
    fn test_diff_only_reports_newer_than_watermark() {
        let current = [ban("C", "mod", 300), ban("A", "mod", 100), ban("B", "mod", 200)];
        let diff = diff_bans(&current, Some(100));
        let names: Vec<_> = diff.new_bans.iter().map(|b| b.username.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
        assert_eq!(diff.watermark, Some(300));
    }

    #[test]
    fn test_diff_never_reemits_at_watermark() {
        let diff = diff_bans(&[ban("A", "mod", 100), ban("B", "mod", 200)], Some(200));
        assert!(diff.new_bans.is_empty());
        assert_eq!(diff.watermark, Some(200));
    }

    #[test]
    fn test_diff_empty_list_keeps_watermark() {
        assert_eq!(diff_bans(&[], Some(50)).watermark, Some(50));
        assert_eq!(diff_bans(&[], None).watermark, None);
    }

    #[test]
    fn test_notice_caps_entries() {
        let bans: Vec<_> = (0..13).map(|i| ban(&format!("p{}", i), "mod", i)).collect();
        let notice = ban_notice(&bans, &HashMap::new(), 10);
        assert_eq!(notice.title, "13 new clan bans");
        assert!(notice.description.contains("**p9**"));
        assert!(!notice.description.contains("**p10**"));
        assert!(notice.description.ends_with("...and 3 more"));
    }

    #[test]
    fn test_notice_mentions_linked_issuer() {
        let mut links = HashMap::new();
        links.insert("big mod".to_string(), 1234);
        let notice = ban_notice(&[ban("Rulebreaker", "Big Mod", 10)], &links, 10);
        assert_eq!(notice.title, "New clan ban");
        assert!(notice.description.contains("banned by <@1234>"));
    }

    #[tokio::test]
    async fn test_second_poll_announces_only_new_ban() {
        let source = FakeSource::default();
        let store = MemoryFeedStore::default();
        let notifier = RecordingNotifier::default();

        source.set_bans(vec![ban("A", "mod", 100), ban("B", "mod", 200)]);
        let first = run_ban_check(&source, &store, &notifier, CHANNEL, 10).await.unwrap();
        assert_eq!(first, 0);

        source.set_bans(vec![ban("A", "mod", 100), ban("B", "mod", 200), ban("C", "mod", 300)]);
        let second = run_ban_check(&source, &store, &notifier, CHANNEL, 10).await.unwrap();
        assert_eq!(second, 1);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, CHANNEL);
        assert!(sent[0].1.description.contains("**C**"));
        assert!(!sent[0].1.description.contains("**A**"));
        assert!(!sent[0].1.description.contains("**B**"));

        // unchanged list: nothing more
        let third = run_ban_check(&source, &store, &notifier, CHANNEL, 10).await.unwrap();
        assert_eq!(third, 0);
        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_send_keeps_watermark() {
        let source = FakeSource::default();
        let store = MemoryFeedStore::default();
        let notifier = RecordingNotifier::default();
        store.set_watermark(BAN_WATERMARK, "100").await.unwrap();

        source.set_bans(vec![ban("B", "mod", 200)]);
        notifier.fail_next(NotifyError::RateLimited);
        assert!(run_ban_check(&source, &store, &notifier, CHANNEL, 10).await.is_err());
        assert_eq!(store.watermark(BAN_WATERMARK).await.unwrap().as_deref(), Some("100"));

        // retried on the next tick
        assert_eq!(run_ban_check(&source, &store, &notifier, CHANNEL, 10).await.unwrap(), 1);
        assert_eq!(store.watermark(BAN_WATERMARK).await.unwrap().as_deref(), Some("200"));
    }

    #[tokio::test]
    async fn test_upstream_error_skips_tick() {
        let source = FakeSource::default();
        let store = MemoryFeedStore::default();
        let notifier = RecordingNotifier::default();
        *source.bans_error.lock().unwrap() =
            Some(crate::services::roat::StatsError::Transient("timed out".to_string()));

        let result = run_ban_check(&source, &store, &notifier, CHANNEL, 10).await;
        assert!(matches!(result, Err(Error::Transient(_))));
        assert!(store.watermark(BAN_WATERMARK).await.unwrap().is_none());
        assert!(notifier.sent().is_empty());
    }
}
