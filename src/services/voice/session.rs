//! Per (user, guild) voice session state machine.
//!
//! `Idle` is `joined_at == None`, `InSession` is `joined_at == Some(start)`.
//! Elapsed time is always credited to the week in which the session closes,
//! and time spent in an ignored channel is never credited.

use chrono::{DateTime, Utc};

use super::week::WeekKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Tracked,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceEvent {
    /// Voice presence moved between channels (`None` = not in voice)
    Move {
        from: Option<ChannelKind>,
        to: Option<ChannelKind>,
    },
    /// Credit an open session up to now and keep it open
    Checkpoint,
    /// Presence observed after a restart (`None` = not in voice)
    Observed(Option<ChannelKind>),
}

/// Time folded into a week when a session closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credit {
    pub week: WeekKey,
    pub millis: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoiceSession {
    pub joined_at: Option<DateTime<Utc>>,
    pub last_event_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Event at or before the last processed one; state untouched
    Stale,
    Applied(Option<Credit>),
}

impl VoiceSession {
    pub fn is_open(&self) -> bool {
        self.joined_at.is_some()
    }

    /// Apply one event at `now`. Replaying an already processed event is a no-op.
    pub fn apply(&mut self, event: VoiceEvent, now: DateTime<Utc>) -> Outcome {
        if self.last_event_at.is_some_and(|last| now <= last) {
            return Outcome::Stale;
        }
        self.last_event_at = Some(now);

        let open = self.joined_at.take();
        let credit = match event {
            VoiceEvent::Move { from, to } => {
                let credit = match (from, open) {
                    (Some(ChannelKind::Tracked), Some(start)) => Some(close(start, now)),
                    // duplicate join: keep the session that is already running
                    (None, Some(start)) if to == Some(ChannelKind::Tracked) => {
                        self.joined_at = Some(start);
                        return Outcome::Applied(None);
                    }
                    // origin unknown (no cached state): the open session was tracked time
                    (None, Some(start)) => Some(close(start, now)),
                    // open session while outside a tracked channel: never credit it
                    _ => None,
                };

                if to == Some(ChannelKind::Tracked) {
                    self.joined_at = Some(now);
                }
                credit
            }
            VoiceEvent::Checkpoint => open.map(|start| {
                self.joined_at = Some(now);
                close(start, now)
            }),
            // presence before `now` is unknown: start counting from here
            VoiceEvent::Observed(Some(ChannelKind::Tracked)) => {
                self.joined_at = Some(now);
                None
            }
            // departure time unknown: close without credit
            VoiceEvent::Observed(_) => None,
        };

        Outcome::Applied(credit)
    }
}

fn close(start: DateTime<Utc>, now: DateTime<Utc>) -> Credit {
    Credit {
        week: WeekKey::of(now),
        millis: (now - start).num_milliseconds().max(0),
    }
}

/// Stored total for the current week plus any still-open session. Pure read.
pub fn project_weekly_ms(
    stored_millis: i64,
    joined_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> i64 {
    let open = joined_at
        .map(|start| (now - start).num_milliseconds().max(0))
        .unwrap_or(0);
    stored_millis + open
}
