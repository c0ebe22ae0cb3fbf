pub mod notify;
pub mod polling;
pub mod roat;
pub mod tracking;
pub mod voice;
pub mod weekly;
