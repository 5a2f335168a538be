//! Payment recorder.

use common::{PaymentId, TransactionId};
use rust_decimal::Decimal;
use store::{InventoryStore, NewPayment, PaymentMethod, PaymentStatus, StoreExt};

use crate::error::{LedgerError, Result};

/// Decimal places kept by the `amount_paid` column.
pub const AMOUNT_SCALE: u32 = 4;

/// Exclusive upper bound of the `amount_paid` column, `NUMERIC(19, 4)`.
const AMOUNT_LIMIT: i64 = 1_000_000_000_000_000;

/// Checks that `amount` is stored exactly by every store.
fn validate_amount(amount: Decimal) -> Result<()> {
    let reason = if amount < Decimal::ZERO {
        "must not be negative"
    } else if amount.normalize().scale() > AMOUNT_SCALE {
        "at most 4 decimal places"
    } else if amount >= Decimal::from(AMOUNT_LIMIT) {
        "must be less than 10^15"
    } else {
        return Ok(());
    };
    Err(LedgerError::InvalidAmount { amount, reason })
}

/// Service for appending payments against recorded transactions.
///
/// Payments are not reconciled against the transaction they reference;
/// any non-negative amount is accepted.
pub struct PaymentRecorder<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> PaymentRecorder<S> {
    /// Creates a new recorder over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Records a payment and returns its identifier.
    ///
    /// Fails if `amount` is negative, has more than [`AMOUNT_SCALE`] decimal
    /// places or reaches 10^15, or if `transaction_id` does not reference a
    /// recorded transaction.
    #[tracing::instrument(skip(self))]
    pub async fn record_payment(
        &self,
        transaction_id: TransactionId,
        amount: Decimal,
        method: PaymentMethod,
        status: PaymentStatus,
    ) -> Result<PaymentId> {
        validate_amount(amount)?;

        // Transactions are never deleted, so the row cannot vanish before the insert
        if !self.store.transaction_exists(transaction_id).await? {
            return Err(LedgerError::TransactionNotFound(transaction_id));
        }

        let payment = self
            .store
            .insert_payment(NewPayment {
                transaction_id,
                amount,
                method,
                status,
            })
            .await?;

        metrics::counter!("ledger_payments_recorded_total", "status" => status.as_str())
            .increment(1);
        tracing::debug!(payment_id = %payment.id, "payment recorded");

        Ok(payment.id)
    }
}
