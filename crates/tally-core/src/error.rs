//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Cart / stock rule violations                   │
//! │  └── ValidationError  - Malformed catalog snapshots                    │
//! │                                                                         │
//! │  tally-sync errors (separate crate)                                    │
//! │  └── SyncError        - Transport, config, rejected snapshots          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SyncError → View Layer            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every message names the product key it is about, so the view layer can
//! show it as-is.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and stock rule violations.
///
/// None of these leave partial state behind: the operation that produced
/// the error did not mutate anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The product key has never been observed in a catalog sync.
    ///
    /// ## When This Occurs
    /// - Add/quantity query for a key the server never reported
    /// - A stale UI button for a product from another session
    #[error("Item does not exist: {0}")]
    ItemNotFound(String),

    /// Add attempted while no unit is left in stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "Add" (stock: 0)
    ///      │
    ///      ▼
    /// add_item_to_cart("Box1")
    ///      │
    ///      ▼
    /// OutOfStock("Box1")
    ///      │
    ///      ▼
    /// UI shows: "Item out of stock: Box1"
    /// ```
    #[error("Item out of stock: {0}")]
    OutOfStock(String),

    /// Catalog snapshot failed validation (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Catalog snapshot validation errors.
///
/// Raised before reconciliation touches any state, so a rejected snapshot
/// is never partially applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value must not be negative.
    #[error("{field} of {key} must not be negative, got {value}")]
    Negative {
        key: String,
        field: String,
        value: i64,
    },

    /// Invalid format (e.g. non-numeric price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_messages() {
        assert_eq!(
            CoreError::OutOfStock("Box1".to_string()).to_string(),
            "Item out of stock: Box1"
        );
        assert_eq!(
            CoreError::ItemNotFound("Ghost".to_string()).to_string(),
            "Item does not exist: Ghost"
        );
    }

    #[test]
    fn test_snapshot_error_messages() {
        let err = ValidationError::Required {
            field: "product key".to_string(),
        };
        assert_eq!(err.to_string(), "product key is required");

        let err = ValidationError::Negative {
            key: "Box1".to_string(),
            field: "quantity".to_string(),
            value: -3,
        };
        assert_eq!(
            err.to_string(),
            "quantity of Box1 must not be negative, got -3"
        );
    }

    #[test]
    fn test_snapshot_error_wraps_into_core_error() {
        let validation_err = ValidationError::Required {
            field: "label".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
