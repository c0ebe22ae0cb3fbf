pub mod ban_link;
pub mod clan_member;
pub mod tracked_player;
pub mod voice_activity;
pub mod watermark;
pub mod weekly_kill;
