pub mod config;
pub mod error;
pub mod models;

pub use config::PubseekConfig;
pub use error::{PubseekError, Result};
