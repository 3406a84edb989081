//! # Validation Module
//!
//! Input validation utilities for the ledger core.
//!
//! Every mutating entry point validates its arguments *before* touching any
//! state, so a rejected call leaves the transaction exactly as it was.
//!
//! ## Usage
//! ```rust
//! use tillbook_core::validation::{validate_product_code, validate_quantity};
//!
//! // Validate a code before building a line item
//! validate_product_code("COKE-330").unwrap();
//!
//! // Validate a quantity before a line-item operation
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product code (barcode / SKU).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Should contain only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use tillbook_core::validation::validate_product_code;
///
/// assert!(validate_product_code("COKE-330").is_ok());
/// assert!(validate_product_code("").is_err());
/// assert!(validate_product_code("has space").is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "product code".to_string(),
        });
    }

    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "product code".to_string(),
            max: 50,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "product code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0); zero-quantity lines do not exist,
///   they are removed
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use tillbook_core::validation::validate_unit_price_cents;
///
/// assert!(validate_unit_price_cents(1099).is_ok());  // $10.99
/// assert!(validate_unit_price_cents(0).is_ok());     // Free item
/// assert!(validate_unit_price_cents(-100).is_err()); // Invalid
/// ```
pub fn validate_unit_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a discount rate in basis points.
///
/// ## Rules
/// - Must lie in `[0, 10000)` - a 100% discount is not a discount,
///   it is a free ticket, and the rate interval is half-open
pub fn validate_discount_bps(bps: u32) -> ValidationResult<()> {
    if bps >= 10000 {
        return Err(ValidationError::OutOfRange {
            field: "discount rate".to_string(),
            min: 0,
            max: 9999,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_code() {
        // Valid codes
        assert!(validate_product_code("COKE-330").is_ok());
        assert!(validate_product_code("ABC123").is_ok());
        assert!(validate_product_code("product_1").is_ok());

        // Invalid codes
        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("   ").is_err());
        assert!(validate_product_code("has space").is_err());
        assert!(validate_product_code(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_unit_price_cents() {
        assert!(validate_unit_price_cents(0).is_ok());
        assert!(validate_unit_price_cents(1099).is_ok());
        assert!(validate_unit_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_discount_bps() {
        assert!(validate_discount_bps(0).is_ok());
        assert!(validate_discount_bps(1500).is_ok());
        assert!(validate_discount_bps(9999).is_ok());
        assert!(validate_discount_bps(10000).is_err());
        assert!(validate_discount_bps(12000).is_err());
    }
}
