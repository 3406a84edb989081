//! # Return Transaction Engine
//!
//! A return gives units back against a previously paid sale. It references
//! the originating sale **by id only** - a weak reference resolved through
//! the ledger at use time, never an owning pointer, because the sale
//! outlives and is independent of any particular return.
//!
//! The cross-entity parts of the workflow (capacity validation against the
//! sale, commit, rollback) live on `AccountBook`, the only component that
//! can reach both sides of the reference.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{OperationId, OperationStatus};

// =============================================================================
// Return Item
// =============================================================================

/// A line on a return transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReturnItem {
    /// Product code of the sale line being returned against.
    pub product_code: String,

    /// Units returned.
    pub quantity: i64,

    /// Unit price in cents, copied from the originating sale line at return
    /// time - the line-discounted price, so the refund matches what the
    /// customer actually paid per unit.
    pub unit_price_cents: i64,
}

impl ReturnItem {
    /// The refund owed for this line (positive).
    pub fn line_refund(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Return Transaction
// =============================================================================

/// A return against a sale: created `Open`, then either committed
/// (`Completed`, decrementing the originating sale's lines) or rolled back
/// (discarded from the ledger entirely). A settled return cannot be settled
/// again.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReturnTransaction {
    id: OperationId,
    sale_id: OperationId,
    #[ts(as = "String")]
    date: NaiveDate,
    status: OperationStatus,
    items: Vec<ReturnItem>,
    money_cents: i64,
}

impl ReturnTransaction {
    /// Creates an empty return against the given sale, in `Open` status.
    pub fn new(id: OperationId, sale_id: OperationId, date: NaiveDate) -> Self {
        ReturnTransaction {
            id,
            sale_id,
            date,
            status: OperationStatus::Open,
            items: Vec::new(),
            money_cents: 0,
        }
    }

    /// Creates a return with its items supplied up front.
    pub fn with_items(
        id: OperationId,
        sale_id: OperationId,
        date: NaiveDate,
        items: Vec<ReturnItem>,
    ) -> Self {
        let mut ret = ReturnTransaction {
            id,
            sale_id,
            date,
            status: OperationStatus::Open,
            items,
            money_cents: 0,
        };
        ret.refresh_money();
        ret
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn id(&self) -> OperationId {
        self.id
    }

    /// Id of the originating sale (weak reference, resolved via the ledger).
    #[inline]
    pub fn sale_id(&self) -> OperationId {
        self.sale_id
    }

    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[inline]
    pub fn status(&self) -> OperationStatus {
        self.status
    }

    /// The return lines, in insertion order.
    #[inline]
    pub fn items(&self) -> &[ReturnItem] {
        &self.items
    }

    /// The cached monetary value the ledger reads. Negative: a refund
    /// reduces the balance.
    #[inline]
    pub fn money(&self) -> Money {
        Money::from_cents(self.money_cents)
    }

    /// Units of a product already on this return (0 if absent).
    pub fn returned_quantity(&self, product_code: &str) -> i64 {
        self.items
            .iter()
            .find(|i| i.product_code == product_code)
            .map_or(0, |i| i.quantity)
    }

    /// Sets the lifecycle status. Never alters `money`, `id`, or `date`.
    pub fn set_status(&mut self, status: OperationStatus) {
        self.status = status;
    }

    // -------------------------------------------------------------------------
    // Item Management
    // -------------------------------------------------------------------------

    /// Adds returned units, merging with an existing line for the same code.
    ///
    /// Silently ignored once the return has left `Open` - the transaction is
    /// already settled, and a late add is a routine no-op rather than an
    /// error. Capacity validation against the originating sale happens in
    /// `AccountBook::add_return_item`, which resolves the weak reference.
    pub fn add_item(&mut self, product_code: &str, quantity: i64, unit_price: Money) {
        if self.status != OperationStatus::Open {
            return;
        }

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.product_code == product_code)
        {
            item.quantity += quantity;
        } else {
            self.items.push(ReturnItem {
                product_code: product_code.to_string(),
                quantity,
                unit_price_cents: unit_price.cents(),
            });
        }

        self.refresh_money();
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// The refund owed across all lines (positive).
    pub fn compute_refund(&self) -> Money {
        let cents: i64 = self.items.iter().map(|i| i.line_refund().cents()).sum();
        Money::from_cents(cents)
    }

    /// Refreshes the cached `money` from current line state.
    pub fn refresh_money(&mut self) {
        self.money_cents = (-self.compute_refund()).cents();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
