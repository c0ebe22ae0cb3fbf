use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// Live hiscore snapshot of a single player, normalised from the API
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub username: String,
    pub display_name: String,
    pub kills: i64,
    pub deaths: i64,
    pub elo: f64,
    pub jad_kills: i64,
    pub skotizo_kills: i64,
    pub last_seen: String,
    pub clan_rank_name: Option<String>,
    pub player_rank: Option<String>,
    pub donator_rank: i32,
    pub game_mode: String,
}

impl PlayerStats {
    /// Kill/death ratio as shown in lookups; kills when there are no deaths
    pub fn kd_ratio(&self) -> String {
        if self.deaths == 0 {
            self.kills.to_string()
        } else {
            format!("{:.2}", self.kills as f64 / self.deaths as f64)
        }
    }

    pub fn has_positive_kdr(&self) -> bool {
        self.kills >= self.deaths
    }
}

/// A clan ban as listed by the upstream API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BanRecord {
    pub username: String,
    #[serde(default)]
    pub banned_by: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    /// Unix timestamp (seconds)
    pub banned_at: i64,
}

/// Outcome of the most recent clan warfare
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WarfareResult {
    pub created_at: String,
    pub winner_clan: String,
    #[serde(default)]
    pub loser_clan: Option<String>,
    pub total_kills: i64,
    #[serde(default)]
    pub winner_kills: Option<i64>,
    #[serde(default)]
    pub loser_kills: Option<i64>,
}

impl WarfareResult {
    /// Identity used to decide whether this result has already been announced
    pub fn identity_key(&self) -> String {
        format!("{}|{}|{}", self.created_at, self.winner_clan, self.total_kills)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RosterEntry {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiClanInfo {
    #[serde(default, rename = "rankName")]
    pub rank_name: Option<String>,
}

/// Raw player payload; ranks arrive as numbers or strings depending on the account
#[derive(Debug, Deserialize)]
pub(crate) struct ApiPlayer {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub kills: i64,
    #[serde(default)]
    pub deaths: i64,
    #[serde(default)]
    pub elo: f64,
    #[serde(default)]
    pub game_mode: Option<String>,
    #[serde(default)]
    pub player_rank: Option<Value>,
    #[serde(default)]
    pub donator_rank: Option<Value>,
    #[serde(default)]
    pub clan_info: Option<ApiClanInfo>,
    #[serde(default)]
    pub last_seen: Option<String>,
    #[serde(default)]
    pub npc_kills: HashMap<String, i64>,
}

impl ApiPlayer {
    /// `None` when the payload carries no username (the API's not-found shape)
    pub fn into_stats(self) -> Option<PlayerStats> {
        let username = self.username.filter(|u| !u.trim().is_empty())?;
        let jad_kills = npc_kill_count(&self.npc_kills, JAD_NPC);
        let skotizo_kills = npc_kill_count(&self.npc_kills, SKOTIZO_NPC);

        Some(PlayerStats {
            display_name: self.display_name.unwrap_or_else(|| username.clone()),
            username,
            kills: self.kills,
            deaths: self.deaths,
            elo: self.elo,
            jad_kills,
            skotizo_kills,
            last_seen: self.last_seen.unwrap_or_else(|| "Unknown".to_string()),
            clan_rank_name: self.clan_info.and_then(|c| c.rank_name),
            player_rank: self.player_rank.as_ref().and_then(value_to_text),
            donator_rank: self
                .donator_rank
                .as_ref()
                .and_then(value_to_i64)
                .unwrap_or(0) as i32,
            game_mode: self.game_mode.unwrap_or_else(|| "Unknown".to_string()),
        })
    }
}

const JAD_NPC: &str = "TzTok-Jad";
const SKOTIZO_NPC: &str = "Skotizo";

/// Kill count of one NPC, matched by exact name ignoring case
fn npc_kill_count(npc_kills: &HashMap<String, i64>, npc: &str) -> i64 {
    npc_kills
        .iter()
        .find(|(name, _)| name.trim().eq_ignore_ascii_case(npc))
        .map(|(_, count)| *count)
        .unwrap_or(0)
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<PlayerStats> {
        serde_json::from_str::<ApiPlayer>(json)
            .expect("valid json")
            .into_stats()
    }

    #[test]
    fn test_full_player_payload() {
        let stats = parse(
            r#"{
                "username": "swab pure",
                "display_name": "Swab Pure",
                "kills": 1520,
                "deaths": 310,
                "elo": 1432,
                "game_mode": "Normal",
                "player_rank": "Veteran",
                "donator_rank": "3",
                "clan_info": { "rankName": "General" },
                "last_seen": "2 minutes ago",
                "npc_kills": { "TzTok-Jad": 14, "Skotizo": 7, "Vet'ion": 2 }
            }"#,
        )
        .expect("player present");

        assert_eq!(stats.username, "swab pure");
        assert_eq!(stats.display_name, "Swab Pure");
        assert_eq!(stats.kills, 1520);
        assert_eq!(stats.jad_kills, 14);
        assert_eq!(stats.skotizo_kills, 7);
        assert_eq!(stats.donator_rank, 3);
        assert_eq!(stats.player_rank.as_deref(), Some("Veteran"));
        assert_eq!(stats.clan_rank_name.as_deref(), Some("General"));
    }

    #[test]
    fn test_missing_username_is_not_found() {
        assert!(parse(r#"{ "kills": 5 }"#).is_none());
        assert!(parse(r#"{ "username": "  " }"#).is_none());
    }

    #[test]
    fn test_sparse_payload_defaults() {
        let stats = parse(r#"{ "username": "newbie", "donator_rank": 2 }"#).expect("present");
        assert_eq!(stats.kills, 0);
        assert_eq!(stats.jad_kills, 0);
        assert_eq!(stats.donator_rank, 2);
        assert_eq!(stats.game_mode, "Unknown");
        assert_eq!(stats.last_seen, "Unknown");
        assert_eq!(stats.player_rank, None);
    }

    #[test]
    fn test_kd_ratio() {
        let mut stats = parse(r#"{ "username": "a", "kills": 10, "deaths": 0 }"#).expect("present");
        assert_eq!(stats.kd_ratio(), "10");
        stats.deaths = 4;
        assert_eq!(stats.kd_ratio(), "2.50");
        assert!(stats.has_positive_kdr());
        stats.deaths = 11;
        assert!(!stats.has_positive_kdr());
    }

    #[test]
    fn test_warfare_identity_key() {
        let result = WarfareResult {
            created_at: "2026-10-12T18:00:00Z".to_string(),
            winner_clan: "Swab".to_string(),
            loser_clan: Some("Pures".to_string()),
            total_kills: 88,
            winner_kills: Some(50),
            loser_kills: Some(38),
        };
        assert_eq!(result.identity_key(), "2026-10-12T18:00:00Z|Swab|88");
    }

    #[test]
    fn test_boss_kills_match_exact_npc_names() {
        let stats = parse(
            r#"{
                "username": "a",
                "kills": 1,
                "deaths": 1,
                "npc_kills": { "JalTok-Jad": 5, "tztok-jad": 3, "Skotizo's minion": 9 }
            }"#,
        )
        .expect("present");
        assert_eq!(stats.jad_kills, 3);
        assert_eq!(stats.skotizo_kills, 0);

        let stats = parse(
            r#"{ "username": "a", "kills": 1, "deaths": 1, "npc_kills": { "JalTok-Jad": 5 } }"#,
        )
        .expect("present");
        assert_eq!(stats.jad_kills, 0);
    }
}
