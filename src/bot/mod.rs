pub mod data;
pub mod error;
pub mod framework;

pub use data::{Context, Data};
pub use error::Error;
