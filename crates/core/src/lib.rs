//! Shared configuration for the rideboard services.

pub mod config;
pub use config::{AppConfig, AuthConfig, ServerConfig, StoreConfig};
