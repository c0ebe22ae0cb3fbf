mod ban_link;
mod clan_member;
mod tracked_player;
mod voice_activity;
mod weekly_kill;

pub use ban_link::BanLink;
pub use clan_member::ClanMember;
pub use tracked_player::TrackedPlayer;
pub use voice_activity::VoiceActivity;
pub use weekly_kill::WeeklyKillRecord;
