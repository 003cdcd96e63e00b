//! Fieldops Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! behavioral constants shared across all Fieldops components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
