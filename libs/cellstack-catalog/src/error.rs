//! Catalog error types

use thiserror::Error;

/// Errors raised when a string from an untyped document does not name
/// anything the catalog knows about.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown component kind: {0}")]
    UnknownComponent(String),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
