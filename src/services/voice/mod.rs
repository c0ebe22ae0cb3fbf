pub mod session;
pub mod tracker;
pub mod week;

pub use session::{ChannelKind, Credit, VoiceEvent, VoiceSession};
pub use week::WeekKey;
