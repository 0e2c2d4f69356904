//! Shared types, configuration and errors for the NonoTalk client.

pub mod config;
pub mod error;
pub mod types;

pub use config::NonotalkConfig;
pub use error::{NonotalkError, Result};
pub use types::*;
