//! Recurring background jobs that diff upstream state against persisted
//! watermarks and post only what is new.

pub mod bans;
pub mod guard;
pub mod roster;
pub mod scheduler;
pub mod store;
pub mod warfare;

#[cfg(test)]
pub(crate) mod testing;

pub use guard::{JobPermit, JobRegistry};
pub use store::{FeedStore, MemberStore, PgFeedStore, PgMemberStore};
