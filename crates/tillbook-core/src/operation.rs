//! # Balance Operations
//!
//! Everything that changes the shop's cash position is a `BalanceOperation`:
//! a manual credit or debit, a supplier order, a sale, or a return. The
//! five kinds form a closed sum type with a shared accounting contract
//! (id, date, status, signed money), dispatched on the variant tag.
//!
//! ## Sign Conventions
//! ```text
//! ┌──────────────┬──────────────────────────────┬────────────┐
//! │ Kind         │ money derives from           │ Sign       │
//! ├──────────────┼──────────────────────────────┼────────────┤
//! │ Credit       │ stored amount                │ positive   │
//! │ Debit        │ stored amount                │ negative   │
//! │ Order        │ price_per_unit × quantity    │ negative   │
//! │ Sale         │ line items + discounts       │ positive   │
//! │ Return       │ return items                 │ negative   │
//! └──────────────┴──────────────────────────────┴────────────┘
//! ```
//!
//! Serialization is internally tagged (`"kind": "credit" | "debit" | ...`)
//! so the persistence collaborator's records preserve variant identity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::returns::ReturnTransaction;
use crate::sale::SaleTransaction;
use crate::types::{OperationId, OperationStatus};

// =============================================================================
// Credit / Debit
// =============================================================================

/// A manual credit: money added to the shop's position outside of a sale
/// (an owner top-up, a found discrepancy corrected upward).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Credit {
    pub id: OperationId,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub status: OperationStatus,
    /// Amount in cents, stored positive; contributes positively.
    pub amount_cents: i64,
}

impl Credit {
    /// Creates a credit in `Open` status. The amount must be non-negative.
    pub fn new(id: OperationId, date: NaiveDate, amount: Money) -> Self {
        Credit {
            id,
            date,
            status: OperationStatus::Open,
            amount_cents: amount.cents(),
        }
    }
}

/// A manual debit: money taken out of the shop's position outside of an
/// order (rent paid from the till, a corrected overage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Debit {
    pub id: OperationId,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub status: OperationStatus,
    /// Amount in cents, stored positive; contributes negatively.
    pub amount_cents: i64,
}

impl Debit {
    /// Creates a debit in `Open` status. The amount must be non-negative.
    pub fn new(id: OperationId, date: NaiveDate, amount: Money) -> Self {
        Debit {
            id,
            date,
            status: OperationStatus::Open,
            amount_cents: amount.cents(),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A supplier order: quantity of a product bought at a per-unit price.
/// Paying for it reduces the balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: OperationId,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub status: OperationStatus,
    /// Product code ordered. Mutable: the catalog collaborator may renumber
    /// a product, and `AccountBook::update_barcode_in_orders` follows.
    pub product_code: String,
    /// Agreed per-unit price in cents.
    pub price_per_unit_cents: i64,
    /// Units ordered.
    pub quantity: i64,
}

impl Order {
    /// Creates an order in `Open` status.
    pub fn new(
        id: OperationId,
        date: NaiveDate,
        product_code: impl Into<String>,
        price_per_unit: Money,
        quantity: i64,
    ) -> Self {
        Order {
            id,
            date,
            status: OperationStatus::Open,
            product_code: product_code.into(),
            price_per_unit_cents: price_per_unit.cents(),
            quantity,
        }
    }

    /// What paying for this order costs (positive).
    pub fn total_cost(&self) -> Money {
        Money::from_cents(self.price_per_unit_cents).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Operation Kind
// =============================================================================

/// Variant tag of a balance operation, used for filtered views and the
/// type-name labels on reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Credit,
    Debit,
    Order,
    Sale,
    Return,
}

impl OperationKind {
    /// The label reports print for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            OperationKind::Credit => "credit",
            OperationKind::Debit => "debit",
            OperationKind::Order => "order",
            OperationKind::Sale => "sale",
            OperationKind::Return => "return",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Balance Operation
// =============================================================================

/// A ledger entry of any kind.
///
/// The enum is the accounting contract: whatever the variant, an operation
/// has an id, a calendar date, a lifecycle status, and a signed monetary
/// contribution. The ledger never needs to know more.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BalanceOperation {
    Credit(Credit),
    Debit(Debit),
    Order(Order),
    Sale(SaleTransaction),
    Return(ReturnTransaction),
}

impl BalanceOperation {
    /// Unique ledger id.
    pub fn id(&self) -> OperationId {
        match self {
            BalanceOperation::Credit(c) => c.id,
            BalanceOperation::Debit(d) => d.id,
            BalanceOperation::Order(o) => o.id,
            BalanceOperation::Sale(s) => s.id(),
            BalanceOperation::Return(r) => r.id(),
        }
    }

    /// Calendar date of the operation.
    pub fn date(&self) -> NaiveDate {
        match self {
            BalanceOperation::Credit(c) => c.date,
            BalanceOperation::Debit(d) => d.date,
            BalanceOperation::Order(o) => o.date,
            BalanceOperation::Sale(s) => s.date(),
            BalanceOperation::Return(r) => r.date(),
        }
    }

    /// Current lifecycle status.
    pub fn status(&self) -> OperationStatus {
        match self {
            BalanceOperation::Credit(c) => c.status,
            BalanceOperation::Debit(d) => d.status,
            BalanceOperation::Order(o) => o.status,
            BalanceOperation::Sale(s) => s.status(),
            BalanceOperation::Return(r) => r.status(),
        }
    }

    /// Sets the lifecycle status in place.
    ///
    /// An atomic mutation that never changes `money`, `id`, or `date`.
    /// Registered operations should transition through
    /// `AccountBook::set_transaction_status` so the cached balance follows.
    pub fn set_status(&mut self, status: OperationStatus) {
        match self {
            BalanceOperation::Credit(c) => c.status = status,
            BalanceOperation::Debit(d) => d.status = status,
            BalanceOperation::Order(o) => o.status = status,
            BalanceOperation::Sale(s) => s.set_status(status),
            BalanceOperation::Return(r) => r.set_status(status),
        }
    }

    /// The signed monetary contribution of this operation.
    pub fn money(&self) -> Money {
        match self {
            BalanceOperation::Credit(c) => Money::from_cents(c.amount_cents),
            BalanceOperation::Debit(d) => -Money::from_cents(d.amount_cents),
            BalanceOperation::Order(o) => -o.total_cost(),
            BalanceOperation::Sale(s) => s.money(),
            BalanceOperation::Return(r) => r.money(),
        }
    }

    /// The variant tag.
    pub fn kind(&self) -> OperationKind {
        match self {
            BalanceOperation::Credit(_) => OperationKind::Credit,
            BalanceOperation::Debit(_) => OperationKind::Debit,
            BalanceOperation::Order(_) => OperationKind::Order,
            BalanceOperation::Sale(_) => OperationKind::Sale,
            BalanceOperation::Return(_) => OperationKind::Return,
        }
    }

    /// Re-derives the cached `money` of derived-value variants from their
    /// line items. Credit, Debit and Order derive their value directly from
    /// immutable fields, so there is nothing to refresh.
    pub fn refresh_money(&mut self) {
        match self {
            BalanceOperation::Sale(s) => s.refresh_money(),
            BalanceOperation::Return(r) => r.refresh_money(),
            BalanceOperation::Credit(_) | BalanceOperation::Debit(_) | BalanceOperation::Order(_) => {}
        }
    }
}

impl From<Credit> for BalanceOperation {
    fn from(c: Credit) -> Self {
        BalanceOperation::Credit(c)
    }
}

impl From<Debit> for BalanceOperation {
    fn from(d: Debit) -> Self {
        BalanceOperation::Debit(d)
    }
}

impl From<Order> for BalanceOperation {
    fn from(o: Order) -> Self {
        BalanceOperation::Order(o)
    }
}

impl From<SaleTransaction> for BalanceOperation {
    fn from(s: SaleTransaction) -> Self {
        BalanceOperation::Sale(s)
    }
}

impl From<ReturnTransaction> for BalanceOperation {
    fn from(r: ReturnTransaction) -> Self {
        BalanceOperation::Return(r)
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

    #[test]
    fn test_credit_contributes_positively() {
        let op: BalanceOperation = Credit::new(1, test_date(), Money::from_cents(5000)).into();
        assert_eq!(op.money(), Money::from_cents(5000));
        assert_eq!(op.kind(), OperationKind::Credit);
    }

    #[test]
    fn test_debit_stored_positive_contributes_negatively() {
        let op: BalanceOperation = Debit::new(2, test_date(), Money::from_cents(1200)).into();
        assert_eq!(op.money(), Money::from_cents(-1200));
        if let BalanceOperation::Debit(d) = &op {
            assert_eq!(d.amount_cents, 1200); // stored positive
        } else {
            panic!("expected a debit");
        }
    }

    #[test]
    fn test_order_money_is_negative_product_of_price_and_quantity() {
        let op: BalanceOperation =
            Order::new(3, test_date(), "COKE-330", Money::from_cents(60), 24).into();
        assert_eq!(op.money(), Money::from_cents(-1440));
    }

    #[test]
    fn test_status_change_preserves_identity_and_money() {
        let mut op: BalanceOperation = Credit::new(4, test_date(), Money::from_cents(100)).into();
        let money_before = op.money();

        op.set_status(OperationStatus::Paid);
        assert_eq!(op.status(), OperationStatus::Paid);
        assert_eq!(op.id(), 4);
        assert_eq!(op.date(), test_date());
        assert_eq!(op.money(), money_before);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(OperationKind::Credit.to_string(), "credit");
        assert_eq!(OperationKind::Return.to_string(), "return");
    }

    #[test]
    fn test_serialization_is_kind_tagged() {
        let op: BalanceOperation = Order::new(5, test_date(), "CHIPS-150", Money::from_cents(75), 10).into();
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["kind"], "order");
        assert_eq!(json["product_code"], "CHIPS-150");

        let back: BalanceOperation = serde_json::from_value(json).unwrap();
        assert_eq!(back.id(), 5);
        assert_eq!(back.money(), Money::from_cents(-750));
    }
}
