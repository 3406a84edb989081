//! # Domain Types
//!
//! Core domain types used throughout the Tillbook ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │    Product      │   │ OperationStatus  │   │  DiscountRate   │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  code           │   │  Open            │   │  bps (u32)      │      │
//! │  │  description    │   │  Closed          │   │  1000 = 10%     │      │
//! │  │  price_cents    │   │  Paid ◄ counts   │   │  valid: [0,1)   │      │
//! │  └─────────────────┘   │  Completed ◄ "   │   └─────────────────┘      │
//! │                        └──────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Product` is the narrow view of the catalog collaborator: the sale engine
//! snapshots code, description and price from it at add time and never
//! queries the catalog again for that line.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Operation Identity
// =============================================================================

/// Ledger operation identifier.
///
/// Positive, unique within one `AccountBook`, and assigned by the ledger's
/// `generate_new_id` - never minted by callers.
pub type OperationId = i64;

// =============================================================================
// Operation Status
// =============================================================================

/// The lifecycle status of a balance operation.
///
/// ## The Affects-Balance Rule
/// Only `Paid` and `Completed` operations count toward the ledger balance.
/// `Open` and `Closed` never do. This predicate is re-evaluated on every
/// status change - it is the sole determinant of ledger inclusion.
///
/// Which transitions are legal for which operation kind is the calling
/// workflow's responsibility; this layer only defines the states and the
/// inclusion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    /// Operation is in progress (items being added, order being drafted).
    Open,
    /// Operation is finalized but not yet paid for.
    Closed,
    /// Operation has been paid - it now counts toward the balance.
    Paid,
    /// Operation is fully settled - it counts toward the balance.
    Completed,
}

impl OperationStatus {
    /// Whether an operation in this status is included in the ledger balance.
    ///
    /// ## Example
    /// ```rust
    /// use tillbook_core::types::OperationStatus;
    ///
    /// assert!(!OperationStatus::Open.affects_balance());
    /// assert!(!OperationStatus::Closed.affects_balance());
    /// assert!(OperationStatus::Paid.affects_balance());
    /// assert!(OperationStatus::Completed.affects_balance());
    /// ```
    #[inline]
    pub const fn affects_balance(self) -> bool {
        matches!(self, OperationStatus::Paid | OperationStatus::Completed)
    }
}

impl Default for OperationStatus {
    fn default() -> Self {
        OperationStatus::Open
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1500 bps = a 15% discount
///
/// A valid discount lies in `[0%, 100%)`: 10000 bps (a free ticket) is
/// rejected by `validation::validate_discount_bps`, mirroring the rule that
/// a discount may approach but never reach the full price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a discount rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        DiscountRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the discount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Product (catalog view)
// =============================================================================

/// A product as seen through the catalog collaborator.
///
/// This is deliberately narrow: the ledger core only ever needs the stable
/// code, a description for tickets, and the current price. Catalog CRUD,
/// stock levels and the rest of the product record live outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Stable product code (barcode / SKU) - the key line items reference.
    pub code: String,

    /// Display description shown on tickets.
    pub description: String,

    /// Current catalog price in cents.
    pub price_cents: i64,
}

impl Product {
    /// Creates a catalog product view.
    pub fn new(code: impl Into<String>, description: impl Into<String>, price_cents: i64) -> Self {
        Product {
            code: code.into(),
            description: description.into(),
            price_cents,
        }
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
