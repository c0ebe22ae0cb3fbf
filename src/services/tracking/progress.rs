use crate::db::models::TrackedPlayer;
use crate::services::roat::PlayerStats;

/// One tracked metric: value at baseline, value now, and the signed change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricProgress {
    pub baseline: i64,
    pub live: i64,
}

impl MetricProgress {
    pub fn delta(&self) -> i64 {
        self.live - self.baseline
    }

    pub fn formatted_delta(&self) -> String {
        format_delta(self.delta())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub username: String,
    pub kills: MetricProgress,
    pub deaths: MetricProgress,
    pub jad_kills: MetricProgress,
    pub skotizo_kills: MetricProgress,
}

/// Compare a live snapshot against the stored baseline. Never clamps: an
/// upstream stat wipe shows up as a negative change.
pub fn compute_progress(baseline: &TrackedPlayer, live: &PlayerStats) -> ProgressReport {
    ProgressReport {
        username: baseline.username.clone(),
        kills: MetricProgress {
            baseline: baseline.kills,
            live: live.kills,
        },
        deaths: MetricProgress {
            baseline: baseline.deaths,
            live: live.deaths,
        },
        jad_kills: MetricProgress {
            baseline: baseline.jad_kills,
            live: live.jad_kills,
        },
        skotizo_kills: MetricProgress {
            baseline: baseline.skotizo_kills,
            live: live.skotizo_kills,
        },
    }
}

/// Signed delta: `+N` for zero and gains, `-N` for losses
pub fn format_delta(delta: i64) -> String {
    if delta >= 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}
