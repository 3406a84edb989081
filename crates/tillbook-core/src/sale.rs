//! # Sale Transaction Engine
//!
//! Line-item management, discounts, totals and loyalty points for a sale.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. OPEN                                                                │
//! │     └── add_item() / remove_item() / apply_discount_to_item()          │
//! │     └── set_discount_rate()                                            │
//! │                                                                         │
//! │  2. CLOSED (ticket printed, awaiting payment)                          │
//! │     └── set_discount_rate() still allowed                              │
//! │                                                                         │
//! │  3. PAID / COMPLETED (counts toward the ledger balance)                │
//! │     └── everything frozen - except return-driven decrements, which     │
//! │         go through the crate-internal primitive, not the public API    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `compute_total()` is the authoritative price: it re-derives the total
//! from current line state on every call, independent of the cached `money`
//! the ledger reads. The ledger's full recompute uses it to resync.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{LedgerError, LedgerResult};
use crate::money::Money;
use crate::types::{DiscountRate, OperationId, OperationStatus, Product};
use crate::validation::{validate_discount_bps, validate_quantity};
use crate::POINT_VALUE_CENTS;

// =============================================================================
// Ticket Entry
// =============================================================================

/// A line item on a sale ticket.
///
/// Uses the snapshot pattern to freeze product data at the time the item is
/// added: later catalog edits never retroactively alter historical tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TicketEntry {
    /// Stable product code this line references.
    pub product_code: String,

    /// Description at time of adding (frozen).
    pub description: String,

    /// Unit price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity on the line (always > 0; a line at zero is removed).
    pub quantity: i64,

    /// Per-line discount in basis points.
    pub discount_bps: u32,
}

impl TicketEntry {
    /// Creates a ticket entry from a catalog product and quantity.
    ///
    /// ## Price Freezing
    /// The price is captured at this moment. If the catalog price changes
    /// afterwards, this entry retains the original price.
    fn from_product(product: &Product, quantity: i64) -> Self {
        TicketEntry {
            product_code: product.code.clone(),
            description: product.description.clone(),
            unit_price_cents: product.price_cents,
            quantity,
            discount_bps: 0,
        }
    }

    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the per-line discount rate.
    #[inline]
    pub fn discount_rate(&self) -> DiscountRate {
        DiscountRate::from_bps(self.discount_bps)
    }

    /// The line total: `(1 - discount) × quantity × unit price`,
    /// discounted in one basis-point multiplication over the whole line.
    pub fn line_total(&self) -> Money {
        self.unit_price()
            .multiply_quantity(self.quantity)
            .apply_discount(self.discount_rate())
    }

    /// The per-unit price with the line discount applied.
    ///
    /// This is the value a return copies: refunding one unit gives back
    /// what the customer actually paid for it, line discount included.
    pub fn discounted_unit_price(&self) -> Money {
        self.unit_price().apply_discount(self.discount_rate())
    }
}

// =============================================================================
// Sale Transaction
// =============================================================================

/// A sale ticket: an ordered collection of line items plus a sale-level
/// discount, living through the `Open → Closed → Paid → Completed` lifecycle.
///
/// ## Invariants
/// - Entries are unique by `product_code` (re-adding a product increases
///   the existing line's quantity)
/// - Line items and per-line discounts are mutable only while `Open`
/// - The sale-level discount stays mutable through `Closed`, then freezes
/// - The cached `money` tracks `compute_total()` through every sanctioned
///   mutation
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleTransaction {
    id: OperationId,
    #[ts(as = "String")]
    date: NaiveDate,
    status: OperationStatus,
    entries: Vec<TicketEntry>,
    discount_bps: u32,
    money_cents: i64,
}

impl SaleTransaction {
    /// Creates a new, empty sale ticket in `Open` status.
    pub fn new(id: OperationId, date: NaiveDate) -> Self {
        SaleTransaction {
            id,
            date,
            status: OperationStatus::Open,
            entries: Vec::new(),
            discount_bps: 0,
            money_cents: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn id(&self) -> OperationId {
        self.id
    }

    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[inline]
    pub fn status(&self) -> OperationStatus {
        self.status
    }

    /// The line items, in insertion order.
    #[inline]
    pub fn entries(&self) -> &[TicketEntry] {
        &self.entries
    }

    /// The sale-level discount rate.
    #[inline]
    pub fn discount_rate(&self) -> DiscountRate {
        DiscountRate::from_bps(self.discount_bps)
    }

    /// The cached monetary value the ledger reads.
    ///
    /// Kept in sync with `compute_total()` by every sanctioned mutation;
    /// `AccountBook::compute_balance` resyncs it after any out-of-band edit.
    #[inline]
    pub fn money(&self) -> Money {
        Money::from_cents(self.money_cents)
    }

    /// Finds the line for a product code.
    pub fn entry(&self, product_code: &str) -> Option<&TicketEntry> {
        self.entries.iter().find(|e| e.product_code == product_code)
    }

    /// Quantity currently on the line for a product code (0 if absent).
    pub fn quantity_of(&self, product_code: &str) -> i64 {
        self.entry(product_code).map_or(0, |e| e.quantity)
    }

    /// Sets the lifecycle status.
    ///
    /// A status change never alters `money`, `id`, or `date`. Registered
    /// sales should transition through `AccountBook::set_transaction_status`
    /// so the cached balance follows.
    pub fn set_status(&mut self, status: OperationStatus) {
        self.status = status;
    }

    // -------------------------------------------------------------------------
    // Line-Item Management
    // -------------------------------------------------------------------------

    /// Adds a product to the ticket or increases quantity if already present.
    ///
    /// ## Behavior
    /// - Quantity must be positive, or a validation error is returned
    /// - Only legal while the sale is `Open`
    /// - If the product is already on the ticket, the quantities are summed
    ///   (the original price snapshot is kept)
    /// - Otherwise a new line is appended with the product's current catalog
    ///   price and zero discount
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> LedgerResult<()> {
        validate_quantity(quantity)?;
        self.ensure_editable()?;

        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.product_code == product.code)
        {
            entry.quantity += quantity;
        } else {
            self.entries.push(TicketEntry::from_product(product, quantity));
        }

        self.refresh_money();
        Ok(())
    }

    /// Removes `quantity` units of a product from the ticket.
    ///
    /// ## Returns
    /// - `Ok(false)` if no line exists for the product, or the requested
    ///   quantity exceeds what is on the line (no partial overdraw)
    /// - `Ok(true)` after decrementing; a line reaching zero is deleted
    /// - `Err` with a validation error for a non-positive quantity, or an
    ///   illegal-state error unless the sale is `Open`
    pub fn remove_item(&mut self, product_code: &str, quantity: i64) -> LedgerResult<bool> {
        validate_quantity(quantity)?;
        self.ensure_editable()?;

        let removed = self.deduct_entry(product_code, quantity);
        if removed {
            self.refresh_money();
        }
        Ok(removed)
    }

    /// Ungated removal primitive.
    ///
    /// The status gate on `remove_item` lives in the public API; this
    /// primitive stays callable on a `Completed` sale because the
    /// return-commit path must decrement lines on a sale that is otherwise
    /// closed to edits. Only the `AccountBook` workflow reaches it.
    pub(crate) fn deduct_entry(&mut self, product_code: &str, quantity: i64) -> bool {
        let Some(pos) = self
            .entries
            .iter()
            .position(|e| e.product_code == product_code)
        else {
            return false;
        };

        if quantity > self.entries[pos].quantity {
            return false;
        }

        if quantity == self.entries[pos].quantity {
            self.entries.remove(pos);
        } else {
            self.entries[pos].quantity -= quantity;
        }

        true
    }

    /// Applies a per-line discount to the product's line.
    ///
    /// ## Returns
    /// `Ok(false)` if no line matches the code. Only legal while `Open`;
    /// the rate must lie in `[0, 1)`.
    pub fn apply_discount_to_item(
        &mut self,
        product_code: &str,
        rate: DiscountRate,
    ) -> LedgerResult<bool> {
        validate_discount_bps(rate.bps())?;
        self.ensure_editable()?;

        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.product_code == product_code)
        else {
            return Ok(false);
        };

        entry.discount_bps = rate.bps();
        self.refresh_money();
        Ok(true)
    }

    /// Sets the sale-level discount applied over the discounted line sum.
    ///
    /// Permitted while `Open` or `Closed` (pre-payment); frozen once the
    /// sale is `Paid` or `Completed`.
    pub fn set_discount_rate(&mut self, rate: DiscountRate) -> LedgerResult<()> {
        validate_discount_bps(rate.bps())?;

        if self.status.affects_balance() {
            return Err(LedgerError::DiscountLocked {
                id: self.id,
                status: self.status,
            });
        }

        self.discount_bps = rate.bps();
        self.refresh_money();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// The authoritative ticket total, re-derived from current line state:
    /// `(1 - sale discount) × Σ (1 - line discount) × quantity × unit price`.
    pub fn compute_total(&self) -> Money {
        let line_sum: i64 = self.entries.iter().map(|e| e.line_total().cents()).sum();
        Money::from_cents(line_sum).apply_discount(self.discount_rate())
    }

    /// Loyalty points earned: one point per 10 currency units of the final
    /// total, truncated toward zero.
    pub fn compute_points(&self) -> i64 {
        self.compute_total().cents() / POINT_VALUE_CENTS
    }

    /// Refreshes the cached `money` from `compute_total()`.
    pub fn refresh_money(&mut self) {
        self.money_cents = self.compute_total().cents();
    }

    fn ensure_editable(&self) -> LedgerResult<()> {
        if self.status != OperationStatus::Open {
            return Err(LedgerError::SaleNotEditable {
                id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn test_product(code: &str, price_cents: i64) -> Product {
        Product::new(code, format!("Product {}", code), price_cents)
    }

    #[test]
    fn test_add_item() {
        let mut sale = SaleTransaction::new(1, test_date());
        let product = test_product("COKE-330", 999); // $9.99

        sale.add_item(&product, 2).unwrap();

        assert_eq!(sale.entries().len(), 1);
        assert_eq!(sale.quantity_of("COKE-330"), 2);
        assert_eq!(sale.compute_total(), Money::from_cents(1998));
        assert_eq!(sale.money(), Money::from_cents(1998));
    }

    #[test]
    fn test_add_same_product_increases_quantity() {
        let mut sale = SaleTransaction::new(1, test_date());
        let product = test_product("COKE-330", 999);

        sale.add_item(&product, 2).unwrap();
        sale.add_item(&product, 3).unwrap();

        assert_eq!(sale.entries().len(), 1); // still one unique line
        assert_eq!(sale.quantity_of("COKE-330"), 5);
    }

    #[test]
    fn test_re_adding_keeps_original_price_snapshot() {
        let mut sale = SaleTransaction::new(1, test_date());
        sale.add_item(&test_product("COKE-330", 999), 1).unwrap();

        // Catalog price changed between the two adds
        sale.add_item(&test_product("COKE-330", 1099), 1).unwrap();

        let entry = sale.entry("COKE-330").unwrap();
        assert_eq!(entry.quantity, 2);
        assert_eq!(entry.unit_price_cents, 999);
    }

    #[test]
    fn test_add_item_rejects_non_positive_quantity() {
        let mut sale = SaleTransaction::new(1, test_date());
        let product = test_product("COKE-330", 999);

        assert!(sale.add_item(&product, 0).is_err());
        assert!(sale.add_item(&product, -2).is_err());
        assert!(sale.entries().is_empty());
    }

    #[test]
    fn test_add_item_illegal_once_closed() {
        let mut sale = SaleTransaction::new(1, test_date());
        sale.add_item(&test_product("COKE-330", 999), 1).unwrap();
        sale.set_status(OperationStatus::Closed);

        let err = sale.add_item(&test_product("CHIPS-150", 250), 1);
        assert!(matches!(err, Err(LedgerError::SaleNotEditable { .. })));
        assert_eq!(sale.entries().len(), 1);
    }

    #[test]
    fn test_remove_item() {
        let mut sale = SaleTransaction::new(1, test_date());
        sale.add_item(&test_product("COKE-330", 999), 5).unwrap();

        assert!(sale.remove_item("COKE-330", 2).unwrap());
        assert_eq!(sale.quantity_of("COKE-330"), 3);
        assert_eq!(sale.money(), Money::from_cents(2997)); // cache follows

        // Removing the rest deletes the line entirely
        assert!(sale.remove_item("COKE-330", 3).unwrap());
        assert!(sale.entry("COKE-330").is_none());
    }

    #[test]
    fn test_remove_item_refuses_overdraw_and_unknown_code() {
        let mut sale = SaleTransaction::new(1, test_date());
        sale.add_item(&test_product("COKE-330", 999), 2).unwrap();

        assert!(!sale.remove_item("COKE-330", 3).unwrap()); // no partial overdraw
        assert_eq!(sale.quantity_of("COKE-330"), 2);
        assert!(!sale.remove_item("CHIPS-150", 1).unwrap());
    }

    #[test]
    fn test_sale_total_with_sale_discount() {
        // quantity=5, unit price=$10.00, line discount=0, sale discount=10%
        let mut sale = SaleTransaction::new(1, test_date());
        sale.add_item(&test_product("P1", 1000), 5).unwrap();
        sale.set_discount_rate(DiscountRate::from_bps(1000)).unwrap();

        assert_eq!(sale.compute_total(), Money::from_cents(4500)); // $45.00
    }

    #[test]
    fn test_nested_line_and_sale_discounts() {
        // 2 × $20.00 at 25% off the line = $30.00; 10% off the sale = $27.00
        let mut sale = SaleTransaction::new(1, test_date());
        sale.add_item(&test_product("P1", 2000), 2).unwrap();
        assert!(sale
            .apply_discount_to_item("P1", DiscountRate::from_bps(2500))
            .unwrap());
        sale.set_discount_rate(DiscountRate::from_bps(1000)).unwrap();

        assert_eq!(sale.compute_total(), Money::from_cents(2700));
    }

    #[test]
    fn test_apply_discount_to_unknown_item_is_false() {
        let mut sale = SaleTransaction::new(1, test_date());
        let applied = sale
            .apply_discount_to_item("GHOST", DiscountRate::from_bps(500))
            .unwrap();
        assert!(!applied);
    }

    #[test]
    fn test_discount_rate_validation() {
        let mut sale = SaleTransaction::new(1, test_date());
        assert!(sale.set_discount_rate(DiscountRate::from_bps(10000)).is_err());
        assert!(sale.set_discount_rate(DiscountRate::from_bps(9999)).is_ok());
    }

    #[test]
    fn test_sale_discount_mutable_while_closed_frozen_once_paid() {
        let mut sale = SaleTransaction::new(1, test_date());
        sale.add_item(&test_product("P1", 1000), 1).unwrap();

        sale.set_status(OperationStatus::Closed);
        assert!(sale.set_discount_rate(DiscountRate::from_bps(500)).is_ok());

        sale.set_status(OperationStatus::Paid);
        let err = sale.set_discount_rate(DiscountRate::from_bps(1000));
        assert!(matches!(err, Err(LedgerError::DiscountLocked { .. })));
        assert_eq!(sale.discount_rate().bps(), 500);
    }

    #[test]
    fn test_compute_points_truncates() {
        // Total $47.30 → 4 points
        let mut sale = SaleTransaction::new(1, test_date());
        sale.add_item(&test_product("P1", 4730), 1).unwrap();
        assert_eq!(sale.compute_points(), 4);

        // Just under one point
        let mut small = SaleTransaction::new(2, test_date());
        small.add_item(&test_product("P2", 999), 1).unwrap();
        assert_eq!(small.compute_points(), 0);
    }

    #[test]
    fn test_discounted_unit_price_captures_line_discount() {
        let mut sale = SaleTransaction::new(1, test_date());
        sale.add_item(&test_product("P1", 1000), 3).unwrap();
        assert!(sale
            .apply_discount_to_item("P1", DiscountRate::from_bps(2000))
            .unwrap());

        let entry = sale.entry("P1").unwrap();
        assert_eq!(entry.discounted_unit_price(), Money::from_cents(800));
    }

    #[test]
    fn test_status_change_never_touches_money() {
        let mut sale = SaleTransaction::new(1, test_date());
        sale.add_item(&test_product("P1", 1000), 2).unwrap();
        let before = sale.money();

        sale.set_status(OperationStatus::Paid);
        assert_eq!(sale.money(), before);
        assert_eq!(sale.id(), 1);
        assert_eq!(sale.date(), test_date());
    }
}
