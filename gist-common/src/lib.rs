//! Common types and utilities shared across pagegist crates.
//!
//! This crate defines the shared error type and the observability helpers
//! used by the binary and the integration tests. It is intentionally
//! lightweight so that every crate can depend on it without heavy
//! transitive costs.
//!
//! - [`GistError`] and [`Result`]: shared error handling
//! - [`observability`]: centralised tracing/logging initialisation

pub mod observability;

/// Error types used across the pagegist pipeline.
#[derive(thiserror::Error, Debug)]
pub enum GistError {
    /// Fetching or reducing the target page failed.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The remote text-generation service reported a failure.
    #[error("Llm error: {0}")]
    Llm(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`GistError`].
pub type Result<T> = std::result::Result<T, GistError>;
