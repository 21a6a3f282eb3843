//! # Validation Module
//!
//! Checks a catalog snapshot before the reconciler is allowed to apply it.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Snapshot Acceptance                                │
//! │                                                                         │
//! │  Layer 1: Transport (tally-sync)                                       │
//! │  ├── HTTP status, timeout                                              │
//! │  └── JSON shape (serde), price → cents conversion                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Keys non-empty (labels are free text, any length)                 │
//! │  └── Prices and quantities non-negative                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Reconciler                                                   │
//! │  └── Applies the whole snapshot or nothing                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::validate_product_key;
//!
//! assert!(validate_product_key("Box1").is_ok());
//! assert!(validate_product_key("  ").is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{CatalogSnapshot, ProductSnapshot};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product key. It must not be empty or whitespace.
pub fn validate_product_key(key: &str) -> ValidationResult<()> {
    if key.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product key".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Snapshot Validators
// =============================================================================

/// Validates one product entry of a snapshot.
///
/// Only the key, price and quantity are checked. Labels and image URLs are
/// display text and pass through untouched.
pub fn validate_product(key: &str, product: &ProductSnapshot) -> ValidationResult<()> {
    validate_product_key(key)?;

    if product.price.is_negative() {
        return Err(ValidationError::Negative {
            key: key.to_string(),
            field: "price".to_string(),
            value: product.price.cents(),
        });
    }

    if product.quantity < 0 {
        return Err(ValidationError::Negative {
            key: key.to_string(),
            field: "quantity".to_string(),
            value: product.quantity,
        });
    }

    Ok(())
}

/// Validates a full catalog snapshot.
///
/// Stops at the first offending product (keys are visited in order, so the
/// reported error is deterministic). An empty catalog is valid.
///
/// ```rust
/// use tally_core::money::Money;
/// use tally_core::types::{CatalogSnapshot, ProductSnapshot};
/// use tally_core::validation::validate_snapshot;
///
/// let mut catalog = CatalogSnapshot::new();
/// catalog.insert("Box1".into(), ProductSnapshot::new("Pens", Money::from_major(5), 7));
/// assert!(validate_snapshot(&catalog).is_ok());
///
/// catalog.insert("Bad".into(), ProductSnapshot::new("Bad", Money::from_major(1), -1));
/// assert!(validate_snapshot(&catalog).is_err());
/// ```
pub fn validate_snapshot(snapshot: &CatalogSnapshot) -> ValidationResult<()> {
    snapshot
        .iter()
        .try_for_each(|(key, product)| validate_product(key, product))
}

// =============================================================================
// Unit Tests
// =============================================================================
