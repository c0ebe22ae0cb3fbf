//! In-memory collaborators for exercising the jobs without Discord or Postgres.

use std::collections::HashMap;
use std::sync::Mutex;

use serenity::async_trait;

use super::store::{FeedStore, MemberStore};
use crate::bot::error::Error;
use crate::services::notify::{Notice, Notifier, NotifyError};
use crate::services::roat::{
    BanRecord, PlayerStats, RosterEntry, StatsError, StatsSource, WarfareResult,
};
use crate::services::tracking::username_key;
use crate::services::weekly::ledger::LedgerEntry;

pub fn player(username: &str, kills: i64) -> PlayerStats {
    PlayerStats {
        username: username.to_string(),
        display_name: username.to_string(),
        kills,
        deaths: 0,
        elo: 1000.0,
        jad_kills: 0,
        skotizo_kills: 0,
        last_seen: "now".to_string(),
        clan_rank_name: Some("Recruit".to_string()),
        player_rank: None,
        donator_rank: 0,
        game_mode: "Normal".to_string(),
    }
}

pub fn ban(username: &str, banned_by: &str, banned_at: i64) -> BanRecord {
    BanRecord {
        username: username.to_string(),
        banned_by: Some(banned_by.to_string()),
        reason: None,
        banned_at,
    }
}

#[derive(Default)]
pub struct FakeSource {
    pub bans: Mutex<Vec<BanRecord>>,
    pub bans_error: Mutex<Option<StatsError>>,
    pub warfare: Mutex<Option<WarfareResult>>,
    pub roster: Mutex<Vec<RosterEntry>>,
    pub players: Mutex<HashMap<String, Result<PlayerStats, StatsError>>>,
}

impl FakeSource {
    pub fn set_bans(&self, bans: Vec<BanRecord>) {
        *self.bans.lock().unwrap() = bans;
    }

    pub fn set_player(&self, username: &str, result: Result<PlayerStats, StatsError>) {
        self.players
            .lock()
            .unwrap()
            .insert(username_key(username), result);
        self.roster.lock().unwrap().push(RosterEntry {
            username: username.to_string(),
        });
    }
}

#[async_trait]
impl StatsSource for FakeSource {
    async fn fetch_player_stats(&self, username: &str) -> Result<PlayerStats, StatsError> {
        self.players
            .lock()
            .unwrap()
            .get(&username_key(username))
            .cloned()
            .unwrap_or_else(|| Err(StatsError::NotFound(username.to_string())))
    }

    async fn fetch_ban_list(&self) -> Result<Vec<BanRecord>, StatsError> {
        if let Some(err) = self.bans_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.bans.lock().unwrap().clone())
    }

    async fn fetch_warfare_result(&self) -> Result<Option<WarfareResult>, StatsError> {
        Ok(self.warfare.lock().unwrap().clone())
    }

    async fn fetch_clan_roster(&self) -> Result<Vec<RosterEntry>, StatsError> {
        Ok(self.roster.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MemoryFeedStore {
    pub watermarks: Mutex<HashMap<String, String>>,
    pub links: Mutex<HashMap<String, u64>>,
}

#[async_trait]
impl FeedStore for MemoryFeedStore {
    async fn watermark(&self, name: &str) -> Result<Option<String>, Error> {
        Ok(self.watermarks.lock().unwrap().get(name).cloned())
    }

    async fn set_watermark(&self, name: &str, value: &str) -> Result<(), Error> {
        self.watermarks
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn linked_discord_ids(&self, names: &[String]) -> Result<HashMap<String, u64>, Error> {
        let links = self.links.lock().unwrap();
        Ok(names
            .iter()
            .map(|n| username_key(n))
            .filter_map(|key| links.get(&key).map(|id| (key, *id)))
            .collect())
    }
}

/// Records every notice; fails with the queued errors first
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(u64, Notice)>>,
    pub failures: Mutex<Vec<NotifyError>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(u64, Notice)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_next(&self, err: NotifyError) {
        self.failures.lock().unwrap().push(err);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, channel_id: u64, notice: &Notice) -> Result<(), NotifyError> {
        if let Some(err) = self.failures.lock().unwrap().pop() {
            return Err(err);
        }
        self.sent.lock().unwrap().push((channel_id, notice.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryMemberStore {
    pub members: Mutex<HashMap<String, PlayerStats>>,
    pub ledger: Mutex<HashMap<String, LedgerEntry>>,
}

#[async_trait]
impl MemberStore for MemoryMemberStore {
    async fn upsert_member(&self, stats: &PlayerStats) -> Result<(), Error> {
        self.members
            .lock()
            .unwrap()
            .insert(username_key(&stats.username), stats.clone());
        Ok(())
    }

    async fn apply_live_total(&self, username: &str, live_total: i64) -> Result<(), Error> {
        let mut ledger = self.ledger.lock().unwrap();
        let key = username_key(username);
        let next = match ledger.get(&key) {
            Some(entry) => entry.apply_live_total(live_total),
            None => LedgerEntry::first_seen(live_total),
        };
        ledger.insert(key, next);
        Ok(())
    }
}
