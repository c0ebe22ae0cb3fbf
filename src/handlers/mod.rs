pub mod event_handler;
pub mod voice_state;
