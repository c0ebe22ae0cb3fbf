//! Rolling "kills gained since last reset" counter.
//!
//! Only positive movement of a player's lifetime kill total is credited. A
//! total that drops (upstream stat wipe) or stays put re-baselines the
//! counter without crediting, so a reset upstream never eats future gains.

use std::collections::BTreeMap;

/// Counter state of one player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    pub weekly_kills: i64,
    pub last_total_kills_seen: i64,
}

impl LedgerEntry {
    /// Entry for a player seen for the first time
    pub fn first_seen(live_total: i64) -> Self {
        Self {
            weekly_kills: 0,
            last_total_kills_seen: live_total,
        }
    }

    /// Fold a freshly observed lifetime total into the counter
    pub fn apply_live_total(self, live_total: i64) -> Self {
        let gained = live_total - self.last_total_kills_seen;

        Self {
            weekly_kills: if gained > 0 {
                self.weekly_kills + gained
            } else {
                self.weekly_kills
            },
            last_total_kills_seen: live_total,
        }
    }

    /// Zero the weekly counter, pinning the baseline to the latest known
    /// total when there is one. `None` when nothing would change.
    pub fn reset(self, known_total: Option<i64>) -> Option<Self> {
        let reset = Self {
            weekly_kills: 0,
            last_total_kills_seen: known_total.unwrap_or(self.last_total_kills_seen),
        };

        (reset != self).then_some(reset)
    }
}

/// Counters a weekly reset has to write, keyed by username key. Existing
/// counters are zeroed and pinned to the member's latest known total;
/// members without a counter get a zeroed one. Counters already in their
/// reset state are left out, so planning against the result is empty.
pub fn plan_reset(
    counters: &BTreeMap<String, LedgerEntry>,
    known_totals: &BTreeMap<String, i64>,
) -> BTreeMap<String, LedgerEntry> {
    let mut plan: BTreeMap<String, LedgerEntry> = counters
        .iter()
        .filter_map(|(key, entry)| {
            entry
                .reset(known_totals.get(key).copied())
                .map(|reset| (key.clone(), reset))
        })
        .collect();

    for (key, total) in known_totals {
        if !counters.contains_key(key) {
            plan.insert(key.clone(), LedgerEntry::first_seen(*total));
        }
    }

    plan
}

/// Weekly standings: most kills first, ties by username key ascending
pub fn rank_weekly(mut rows: Vec<(String, LedgerEntry)>, limit: usize) -> Vec<(String, LedgerEntry)> {
    rows.sort_by(|a, b| {
        b.1.weekly_kills
            .cmp(&a.1.weekly_kills)
            .then_with(|| a.0.cmp(&b.0))
    });
    rows.truncate(limit);
    rows
}
