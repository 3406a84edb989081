//! # Error Types
//!
//! Domain-specific error types for tillbook-core.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Failure Outcomes                                │
//! │                                                                         │
//! │  Invalid argument   → ValidationError     (state left unchanged)       │
//! │  Illegal state      → LedgerError         (all-or-nothing, no partial  │
//! │                                            mutation)                    │
//! │  Not found          → Option::None / false (routine, callers branch)   │
//! │  Capacity violation → false               ("not allowed", not an error)│
//! │                                                                         │
//! │  Nothing here is fatal to the process; every failure is a local,       │
//! │  recoverable-by-the-caller outcome.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (operation id, current status)
//! 3. Errors are enum variants, never String
//! 4. "Does not exist" is an expected outcome, so lookups return `Option`,
//!    they do not error

use thiserror::Error;

use crate::types::{OperationId, OperationStatus};

// =============================================================================
// Ledger Error
// =============================================================================

/// Ledger business-rule errors.
///
/// These represent illegal-state rejections: the call was well-formed but
/// the governing transaction is in a status that forbids it.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The sale's line items can no longer change.
    ///
    /// ## When This Occurs
    /// - Adding an item to a sale that left `Open`
    /// - Removing an item through the public API after the sale closed
    ///   (the return-commit path uses an internal primitive instead)
    /// - Changing a per-line discount after the sale closed
    #[error("sale {id} is {status:?}, line items can only change while open")]
    SaleNotEditable {
        id: OperationId,
        status: OperationStatus,
    },

    /// The sale-level discount is frozen once the sale has been paid.
    ///
    /// ## When This Occurs
    /// - Calling `set_discount_rate` on a `Paid` or `Completed` sale.
    ///   It remains legal while `Open` or `Closed` (pre-payment).
    #[error("sale {id} is {status:?}, discount is locked after payment")]
    DiscountLocked {
        id: OperationId,
        status: OperationStatus,
    },

    /// An operation with this id is already registered in the ledger.
    #[error("operation {id} is already registered")]
    DuplicateOperation { id: OperationId },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., product code with forbidden characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================
