//! # Account Book
//!
//! The ledger itself: exclusive owner of every registered balance
//! operation, the id generator, and the cached running balance.
//!
//! ## Two Balance Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cached Aggregate vs. Source of Truth                 │
//! │                                                                         │
//! │  INCREMENTAL (O(1) reads)                                              │
//! │    add_transaction ──────► balance += money   (if status counts)       │
//! │    remove_transaction ───► balance -= money   (if status counted)      │
//! │    set_transaction_status► balance ± money    (if the predicate flips) │
//! │                                                                         │
//! │  FULL RECOMPUTE (recovery)                                             │
//! │    compute_balance ──────► refresh every derived money from line       │
//! │                            items, re-sum counted operations,           │
//! │                            overwrite the cache                         │
//! │                                                                         │
//! │  The incremental path is an optimization whose correctness depends on  │
//! │  money being immutable after registration except through sanctioned    │
//! │  mutations. Anything that edits a transaction's line items out of      │
//! │  band resyncs with compute_balance().                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Single-writer, sequential. No interior mutability, no locking: if the
//! embedding host is multi-threaded, it serializes all mutating calls on a
//! given `AccountBook` externally.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::money::Money;
use crate::operation::{BalanceOperation, Credit, Debit, Order};
use crate::returns::ReturnTransaction;
use crate::sale::SaleTransaction;
use crate::types::{OperationId, OperationStatus};

// =============================================================================
// Account Book
// =============================================================================

/// The shop's ledger.
///
/// Operations are stored keyed by id; ids are ledger-issued and
/// monotonically increasing, so ascending-id iteration is insertion order.
/// There is no process-wide instance: whoever composes this core constructs
/// an `AccountBook` and passes it where it is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBook {
    operations: BTreeMap<OperationId, BalanceOperation>,
    next_id: OperationId,
    balance_cents: i64,
}

impl AccountBook {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        AccountBook {
            operations: BTreeMap::new(),
            next_id: 1,
            balance_cents: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Identity
    // -------------------------------------------------------------------------

    /// Returns a positive id not assigned to any operation in the ledger.
    ///
    /// Sequential calls never repeat a value, including across ids that
    /// were supplied explicitly to `add_transaction` (registration bumps
    /// the generator past them).
    pub fn generate_new_id(&mut self) -> OperationId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // -------------------------------------------------------------------------
    // Registration & Status
    // -------------------------------------------------------------------------

    /// Registers an operation.
    ///
    /// If the operation's status already counts toward the balance, the
    /// cached balance is incremented by its money immediately - an
    /// incremental update, not a recompute.
    ///
    /// ## Errors
    /// `LedgerError::DuplicateOperation` if the id is already registered.
    pub fn add_transaction(&mut self, op: BalanceOperation) -> LedgerResult<OperationId> {
        let id = op.id();
        if self.operations.contains_key(&id) {
            return Err(LedgerError::DuplicateOperation { id });
        }

        if op.status().affects_balance() {
            self.balance_cents += op.money().cents();
        }
        if id >= self.next_id {
            self.next_id = id + 1;
        }

        debug!(id, kind = %op.kind(), money = %op.money(), "registering balance operation");
        self.operations.insert(id, op);
        Ok(id)
    }

    /// Deletes an operation, returning it.
    ///
    /// If it currently affects the balance, the cached balance is
    /// decremented by its money first. Unknown id → `None`.
    pub fn remove_transaction(&mut self, id: OperationId) -> Option<BalanceOperation> {
        let op = self.operations.remove(&id)?;
        if op.status().affects_balance() {
            self.balance_cents -= op.money().cents();
        }
        debug!(id, kind = %op.kind(), "removed balance operation");
        Some(op)
    }

    /// Transitions an operation's status in place.
    ///
    /// The cached balance is adjusted by ± the operation's money only when
    /// the affects-balance predicate flips; `money` itself is untouched.
    /// No-op (`false`) if the operation does not exist.
    pub fn set_transaction_status(&mut self, id: OperationId, status: OperationStatus) -> bool {
        let Some(op) = self.operations.get_mut(&id) else {
            return false;
        };

        let old_status = op.status();
        if old_status.affects_balance() != status.affects_balance() {
            let delta = op.money().cents();
            if status.affects_balance() {
                self.balance_cents += delta;
            } else {
                self.balance_cents -= delta;
            }
        }

        op.set_status(status);
        debug!(id, from = ?old_status, to = ?status, "status transition");
        true
    }

    // -------------------------------------------------------------------------
    // Lookups & Views
    // -------------------------------------------------------------------------

    /// Looks up an operation. "Does not exist" is a routine outcome.
    pub fn get_transaction(&self, id: OperationId) -> Option<&BalanceOperation> {
        self.operations.get(&id)
    }

    /// Mutable lookup.
    ///
    /// This is the sanctioned out-of-band mutation path: editing a counted
    /// transaction's line items (or flipping its status directly) through
    /// this borrow bypasses the incremental balance update, and the caller
    /// resyncs with `compute_balance()`.
    pub fn get_transaction_mut(&mut self, id: OperationId) -> Option<&mut BalanceOperation> {
        self.operations.get_mut(&id)
    }

    /// Looks up a sale transaction by id.
    pub fn get_sale(&self, id: OperationId) -> Option<&SaleTransaction> {
        match self.operations.get(&id) {
            Some(BalanceOperation::Sale(s)) => Some(s),
            _ => None,
        }
    }

    /// Mutable sale lookup (same caveat as `get_transaction_mut`).
    pub fn get_sale_mut(&mut self, id: OperationId) -> Option<&mut SaleTransaction> {
        match self.operations.get_mut(&id) {
            Some(BalanceOperation::Sale(s)) => Some(s),
            _ => None,
        }
    }

    /// Looks up a return transaction by id.
    pub fn get_return(&self, id: OperationId) -> Option<&ReturnTransaction> {
        match self.operations.get(&id) {
            Some(BalanceOperation::Return(r)) => Some(r),
            _ => None,
        }
    }

    /// All operations, ascending id (= insertion order).
    pub fn get_all_transactions(&self) -> Vec<&BalanceOperation> {
        self.operations.values().collect()
    }

    /// All credit operations, insertion order.
    pub fn get_credit_transactions(&self) -> Vec<&Credit> {
        self.operations
            .values()
            .filter_map(|op| match op {
                BalanceOperation::Credit(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// All debit operations, insertion order.
    pub fn get_debit_transactions(&self) -> Vec<&Debit> {
        self.operations
            .values()
            .filter_map(|op| match op {
                BalanceOperation::Debit(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    /// All sale transactions, insertion order.
    pub fn get_sale_transactions(&self) -> Vec<&SaleTransaction> {
        self.operations
            .values()
            .filter_map(|op| match op {
                BalanceOperation::Sale(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// All return transactions, insertion order.
    pub fn get_return_transactions(&self) -> Vec<&ReturnTransaction> {
        self.operations
            .values()
            .filter_map(|op| match op {
                BalanceOperation::Return(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    /// All supplier orders, insertion order.
    pub fn get_orders(&self) -> Vec<&Order> {
        self.operations
            .values()
            .filter_map(|op| match op {
                BalanceOperation::Order(o) => Some(o),
                _ => None,
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Balance
    // -------------------------------------------------------------------------

    /// The cached running balance, O(1).
    #[inline]
    pub fn get_balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }

    /// Whether `amount` is non-negative and covered by the current balance.
    pub fn check_availability(&self, amount: Money) -> bool {
        !amount.is_negative() && amount <= self.get_balance()
    }

    /// Full recompute: re-derives every derived `money` from line items,
    /// re-sums the operations that affect the balance, and overwrites the
    /// cache.
    ///
    /// Idempotent and callable at any time; this is the authoritative
    /// recovery path after any out-of-band mutation of a transaction's
    /// underlying line items.
    pub fn compute_balance(&mut self) -> Money {
        let mut total = 0i64;
        for op in self.operations.values_mut() {
            op.refresh_money();
            if op.status().affects_balance() {
                total += op.money().cents();
            }
        }

        self.balance_cents = total;
        debug!(balance = %self.get_balance(), "full balance recompute");
        self.get_balance()
    }

    /// Clears all operations and zeroes the cache.
    pub fn reset(&mut self) {
        self.operations.clear();
        self.next_id = 1;
        self.balance_cents = 0;
        debug!("account book reset");
    }

    // -------------------------------------------------------------------------
    // Manual Balance Updates
    // -------------------------------------------------------------------------

    /// Records a manual balance update: a `Paid` credit for a non-negative
    /// amount, or a `Paid` debit for a negative one.
    ///
    /// A debit the current balance cannot cover is refused (`None`) and
    /// leaves the ledger unchanged.
    pub fn record_balance_update(
        &mut self,
        date: NaiveDate,
        amount_cents: i64,
    ) -> Option<OperationId> {
        let id = if amount_cents >= 0 {
            let mut credit = Credit::new(self.generate_new_id(), date, Money::from_cents(amount_cents));
            credit.status = OperationStatus::Paid;
            self.add_transaction(credit.into())
        } else {
            let amount = Money::from_cents(-amount_cents);
            if !self.check_availability(amount) {
                return None;
            }
            let mut debit = Debit::new(self.generate_new_id(), date, amount);
            debit.status = OperationStatus::Paid;
            self.add_transaction(debit.into())
        };

        // The id was freshly generated, so registration cannot collide.
        id.ok()
    }

    // -------------------------------------------------------------------------
    // Catalog Maintenance
    // -------------------------------------------------------------------------

    /// Rewrites the stored product code on every order matching `old_code`,
    /// returning how many were updated. Keeps historical orders attached
    /// when the catalog renumbers a product.
    pub fn update_barcode_in_orders(&mut self, old_code: &str, new_code: &str) -> usize {
        let mut updated = 0;
        for op in self.operations.values_mut() {
            if let BalanceOperation::Order(order) = op {
                if order.product_code == old_code {
                    order.product_code = new_code.to_string();
                    updated += 1;
                }
            }
        }

        if updated > 0 {
            debug!(old_code, new_code, updated, "rewrote product code in orders");
        }
        updated
    }

    // -------------------------------------------------------------------------
    // Return Workflow
    // -------------------------------------------------------------------------
    //
    // The return engine's cross-entity half lives here because the ledger is
    // the only component that can resolve the return's weak reference to its
    // originating sale.

    /// Opens a return against a paid-for sale, registering it `Open`.
    ///
    /// `None` if the sale does not exist or has not been paid for - an
    /// unpaid ticket has no cash effect to reverse.
    pub fn open_return(&mut self, sale_id: OperationId, date: NaiveDate) -> Option<OperationId> {
        match self.get_sale(sale_id) {
            Some(sale) if sale.status().affects_balance() => {}
            _ => return None,
        }

        let id = self.generate_new_id();
        let ret = ReturnTransaction::new(id, sale_id, date);
        debug!(id, sale_id, "opened return transaction");
        // The id is freshly generated, so registration cannot collide.
        self.add_transaction(ret.into()).ok()
    }

    /// Adds returned units to an open return, validating capacity against
    /// the originating sale.
    ///
    /// ## Returns
    /// `false` ("not allowed") when:
    /// - the quantity is not positive
    /// - the return does not exist, is not a return, or is no longer `Open`
    /// - the originating sale or its line for the product is gone
    /// - the cumulative returned quantity would exceed what is still
    ///   present on the sale line
    ///
    /// On success the unit price is copied from the sale line's discounted
    /// unit price, so the refund captures any line discount.
    pub fn add_return_item(
        &mut self,
        return_id: OperationId,
        product_code: &str,
        quantity: i64,
    ) -> bool {
        if quantity <= 0 {
            return false;
        }

        let (sale_id, already_returned) = match self.get_return(return_id) {
            Some(r) if r.status() == OperationStatus::Open => {
                (r.sale_id(), r.returned_quantity(product_code))
            }
            _ => return false,
        };

        let unit_price = match self.get_sale(sale_id).and_then(|s| s.entry(product_code)) {
            Some(entry) if quantity <= entry.quantity - already_returned => {
                entry.discounted_unit_price()
            }
            _ => return false,
        };

        if let Some(BalanceOperation::Return(ret)) = self.operations.get_mut(&return_id) {
            ret.add_item(product_code, quantity, unit_price);
        }
        true
    }

    /// Commits an open return: permanently decrements the matching line
    /// quantities on the originating sale, refreshes the sale's cached
    /// money, and transitions the return to `Completed`.
    ///
    /// The line decrement does not touch the cached balance - only the
    /// status transition does, by the return's own (negative) money. A
    /// return that was already committed or rolled back is rejected.
    pub fn commit_return(&mut self, return_id: OperationId) -> bool {
        let (sale_id, items) = match self.get_return(return_id) {
            Some(r) if r.status() == OperationStatus::Open => (r.sale_id(), r.items().to_vec()),
            _ => return false,
        };

        let Some(sale) = self.get_sale_mut(sale_id) else {
            return false;
        };
        for item in &items {
            // Quantities were validated at add time against this sale.
            sale.deduct_entry(&item.product_code, item.quantity);
        }
        sale.refresh_money();

        debug!(return_id, sale_id, lines = items.len(), "committed return");
        self.set_transaction_status(return_id, OperationStatus::Completed)
    }

    /// Rolls back an open return: discards it from the ledger entirely
    /// without touching the sale. A settled return is rejected.
    pub fn rollback_return(&mut self, return_id: OperationId) -> bool {
        match self.get_return(return_id) {
            Some(r) if r.status() == OperationStatus::Open => {}
            _ => return false,
        }

        debug!(return_id, "rolled back return");
        self.remove_transaction(return_id).is_some()
    }
}

impl Default for AccountBook {
    fn default() -> Self {
        AccountBook::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
