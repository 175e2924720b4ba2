pub mod config;
pub mod error;
pub mod types;

pub use config::GamepalConfig;
pub use error::{GamepalError, Result};
pub use types::*;
