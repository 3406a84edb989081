//! # tillbook-core: Pure Business Logic for the Tillbook Ledger
//!
//! This crate is the **heart** of Tillbook: a retail back-office ledger that
//! records every event changing a shop's cash position and exposes a running
//! balance. It contains all business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Tillbook Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Back-Office API Layer (external)                │   │
//! │  │   auth, catalog CRUD, customer registry, JSON persistence       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ library calls                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tillbook-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │ operation │  │ sale      │  │   book    │  │   │
//! │  │   │   Money   │  │  Credit   │  │ returns   │  │ Account-  │  │   │
//! │  │   │ Discount  │  │  Debit    │  │ engines   │  │ Book      │  │   │
//! │  │   │   math    │  │  Order…   │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Domain types (OperationStatus, DiscountRate, Product)
//! - [`operation`] - The BalanceOperation family (Credit, Debit, Order,
//!   Sale, Return) and its shared accounting contract
//! - [`sale`] - SaleTransaction engine: line items, discounts, totals,
//!   loyalty points
//! - [`returns`] - ReturnTransaction engine: partial returns against a sale
//! - [`book`] - AccountBook: the ledger, its id generator, and the cached
//!   running balance
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every operation is deterministic - same input =
//!    same output, and every call completes or returns a definitive error
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here;
//!    persistence and catalog lookups are external collaborators
//! 3. **Integer Money**: all monetary values are cents (i64) to avoid
//!    float errors
//! 4. **Single Writer**: no interior mutability or locking; a multi-threaded
//!    host serializes mutating calls externally
//!
//! ## Example Usage
//!
//! ```rust
//! use tillbook_core::{AccountBook, Money, OperationStatus, Product, SaleTransaction};
//! use chrono::NaiveDate;
//!
//! let mut book = AccountBook::new();
//! let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//!
//! // Ring up a sale
//! let id = book.generate_new_id();
//! let mut sale = SaleTransaction::new(id, date);
//! sale.add_item(&Product::new("COKE-330", "Coca-Cola 330ml", 299), 2).unwrap();
//! book.add_transaction(sale.into()).unwrap();
//!
//! // Payment makes it count
//! book.set_transaction_status(id, OperationStatus::Paid);
//! assert_eq!(book.get_balance(), Money::from_cents(598));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod book;
pub mod error;
pub mod money;
pub mod operation;
pub mod returns;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tillbook_core::Money` instead of
// `use tillbook_core::money::Money`

pub use book::AccountBook;
pub use error::{LedgerError, LedgerResult, ValidationError};
pub use money::Money;
pub use operation::{BalanceOperation, Credit, Debit, Order, OperationKind};
pub use returns::{ReturnItem, ReturnTransaction};
pub use sale::{SaleTransaction, TicketEntry};
pub use types::{DiscountRate, OperationId, OperationStatus, Product};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Cents of final ticket total worth one loyalty point.
///
/// ## Business Reason
/// Customers earn one point per 10 currency units spent, truncated toward
/// zero. Can be made configurable per shop in future versions.
pub const POINT_VALUE_CENTS: i64 = 1000;
