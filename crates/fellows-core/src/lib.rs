//! Chain-agnostic domain logic for the Fellowship report.
//!
//! This crate provides:
//! - Core domain types (`types` module)
//! - Membership filtering and ranking (`members` module)
//! - Report rows and output rendering (`display` module)
//! - Configuration loading (`config` module)

pub mod config;
pub mod display;
pub mod members;
pub mod types;

pub use config::{AppConfig, ConfigError, EndpointConfig, TokenConfig};
pub use display::*;
pub use members::*;
pub use types::*;
