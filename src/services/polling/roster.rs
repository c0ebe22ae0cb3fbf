use tracing::{debug, info, warn};

use super::store::MemberStore;
use crate::bot::error::Error;
use crate::services::roat::{StatsError, StatsSource};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RosterSummary {
    pub refreshed: usize,
    pub failed: usize,
}

/// Refresh every clan member's snapshot and feed their kill total into the
/// weekly ledger. A member that cannot be fetched is skipped; only a failed
/// roster fetch fails the whole run.
pub async fn refresh_roster(
    source: &dyn StatsSource,
    store: &dyn MemberStore,
) -> Result<RosterSummary, Error> {
    let roster = source.fetch_clan_roster().await?;
    debug!("Refreshing {} clan members", roster.len());

    let mut summary = RosterSummary::default();

    for entry in roster {
        let stats = match source.fetch_player_stats(&entry.username).await {
            Ok(stats) => stats,
            Err(StatsError::NotFound(_)) => {
                debug!("Clan member {} has no hiscore entry", entry.username);
                summary.failed += 1;
                continue;
            }
            Err(e) => {
                warn!("Skipping clan member {}: {}", entry.username, e);
                summary.failed += 1;
                continue;
            }
        };

        if let Err(e) = store.upsert_member(&stats).await {
            warn!("Failed to store clan member {}: {}", stats.username, e);
            summary.failed += 1;
            continue;
        }

        if let Err(e) = store.apply_live_total(&stats.username, stats.kills).await {
            warn!("Failed to update weekly kills for {}: {}", stats.username, e);
            summary.failed += 1;
            continue;
        }

        summary.refreshed += 1;
    }

    info!(
        "Roster refresh done: {} refreshed, {} failed",
        summary.refreshed, summary.failed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::polling::testing::{player, FakeSource, MemoryMemberStore};

    #[tokio::test]
    async fn test_refresh_skips_failing_members() {
        let source = FakeSource::default();
        let store = MemoryMemberStore::default();
        source.set_player("Alpha", Ok(player("Alpha", 100)));
        source.set_player("Bravo", Err(StatsError::Transient("timed out".to_string())));
        source.set_player("Charlie", Ok(player("Charlie", 40)));

        let summary = refresh_roster(&source, &store).await.unwrap();
        assert_eq!(summary, RosterSummary { refreshed: 2, failed: 1 });

        let members = store.members.lock().unwrap();
        assert!(members.contains_key("alpha"));
        assert!(members.contains_key("charlie"));
        assert!(!members.contains_key("bravo"));
    }

    #[tokio::test]
    async fn test_weekly_ledger_counts_only_gains() {
        let source = FakeSource::default();
        let store = MemoryMemberStore::default();
        source.set_player("Alpha", Ok(player("Alpha", 100)));

        refresh_roster(&source, &store).await.unwrap();
        assert_eq!(store.ledger.lock().unwrap()["alpha"].weekly_kills, 0);

        source
            .players
            .lock()
            .unwrap()
            .insert("alpha".to_string(), Ok(player("Alpha", 107)));
        refresh_roster(&source, &store).await.unwrap();
        assert_eq!(store.ledger.lock().unwrap()["alpha"].weekly_kills, 7);
    }
}
