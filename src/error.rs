//! Error types for inventory expansion and validation
//!
//! Expansion itself never fails: unrecognised patterns degrade to literals.
//! Everything the validator rejects is reported as
//! [`InventoryError::InvalidConfiguration`]; the remaining variants only
//! come from the boundaries (debug dump, renderer hand-off).

use thiserror::Error;

/// Main error type for the inventory pipeline
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Template rendering failed: {0}")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl InventoryError {
    /// Build an [`InventoryError::InvalidConfiguration`] from any message
    pub fn invalid(message: impl Into<String>) -> Self {
        InventoryError::InvalidConfiguration(message.into())
    }

    /// True for the domain error kind raised by validation
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, InventoryError::InvalidConfiguration(_))
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, InventoryError>;
