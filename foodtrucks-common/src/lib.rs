//! Common types and utilities shared across the food truck crates.
//!
//! This crate defines the shared error type and the observability helpers
//! used throughout the workspace. It stays dependency-light so every other
//! crate can depend on it.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`FoodTruckError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use foodtrucks_common::FoodTruckError;
//!
//! let err = FoodTruckError::Dataset("connection refused".into());
//! assert_eq!(err.to_string(), "Dataset fetch failed: connection refused");
//! ```

pub mod observability;

/// Error types used across the food truck crates.
#[derive(thiserror::Error, Debug)]
pub enum FoodTruckError {
    /// The food truck dataset could not be fetched or decoded.
    #[error("Dataset fetch failed: {0}")]
    Dataset(String),

    /// The geocoding request failed or returned an unexpected shape.
    #[error("Geocoding failed: {0}")]
    Geocode(String),

    /// Geocoding succeeded but produced no usable coordinate for the address.
    #[error("No geocoding result for address: {0}")]
    NoGeocodeResult(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A lower layer (HTTP, runtime, etc.) reported an error.
    #[error(transparent)]
    Driver(#[from] anyhow::Error),
}

/// Convenient alias for results that use [`FoodTruckError`].
pub type Result<T> = std::result::Result<T, FoodTruckError>;
