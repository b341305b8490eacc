use super::txn_id::TransactionIdGenerator;
use crate::domain::payment::{ChargeRequest, PaymentOutcome, Receipt, SessionState, TransactionRecord};
use crate::domain::ports::PaymentTerminalBox;
use crate::error::{BridgeError, Result};
use chrono::Local;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Stateful front for a payment terminal.
///
/// Owns the session state: every operation other than `initialize` and
/// `is_ready` expects the session to be `Ready`. Terminal faults never
/// escape as channel errors; they are folded into the returned value.
pub struct PaymentGateway {
    terminal: PaymentTerminalBox,
    state: RwLock<SessionState>,
    ids: TransactionIdGenerator,
}

impl PaymentGateway {
    /// Creates a gateway with an uninitialized session.
    ///
    /// # Arguments
    ///
    /// * `terminal` - The payment terminal the session talks to.
    pub fn new(terminal: PaymentTerminalBox) -> Self {
        Self {
            terminal,
            state: RwLock::new(SessionState::Uninitialized),
            ids: TransactionIdGenerator::new(),
        }
    }

    /// Connects the terminal. A failure is reported as `false`, not as an error.
    pub async fn initialize(&self) -> bool {
        info!("initializing payment terminal");
        let mut state = self.state.write().await;
        match self.terminal.connect().await {
            Ok(()) => {
                *state = SessionState::Ready;
                info!("payment terminal ready");
                true
            }
            Err(e) => {
                *state = SessionState::Uninitialized;
                error!(error = %e, "payment terminal initialization failed");
                false
            }
        }
    }

    /// Charges the terminal and reports the transaction.
    ///
    /// Fails with `NotInitialized` before a successful `initialize`. A terminal
    /// fault is returned as `PaymentOutcome::Error`, never as an error.
    ///
    /// # Arguments
    ///
    /// * `amount` - The amount to charge.
    /// * `currency` - ISO currency code, echoed on the record.
    /// * `payment_method` - Method hint forwarded to the terminal.
    pub async fn process_payment(
        &self,
        amount: Decimal,
        currency: &str,
        payment_method: &str,
    ) -> Result<PaymentOutcome> {
        if !self.is_ready().await {
            warn!("payment requested before terminal initialization");
            return Err(BridgeError::NotInitialized);
        }

        info!(%amount, currency, payment_method, "processing payment");
        let request = ChargeRequest {
            amount,
            currency: currency.to_string(),
            payment_method: payment_method.to_string(),
        };

        let outcome = match self.terminal.charge(&request).await {
            Ok(card) => {
                let record = TransactionRecord {
                    transaction_id: self.ids.generate(),
                    amount,
                    currency: request.currency,
                    card_type: card.card_type,
                    card_number_masked: card.card_number_masked,
                    payment_method: request.payment_method,
                    timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
                    receipt_printed: false,
                };
                info!(transaction_id = %record.transaction_id, "payment approved");
                PaymentOutcome::Success(record)
            }
            Err(e) => {
                error!(error = %e, "payment failed");
                PaymentOutcome::Error {
                    message: e.to_string(),
                }
            }
        };
        Ok(outcome)
    }

    /// Advisory: the terminal may already have committed the operation.
    pub async fn cancel_payment(&self) -> bool {
        debug!("cancelling payment");
        match self.terminal.cancel().await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "payment cancellation failed");
                false
            }
        }
    }

    pub async fn print_receipt(&self, receipt: &Receipt) -> bool {
        info!(
            transaction_id = %receipt.transaction_id,
            amount = %receipt.amount,
            currency = %receipt.currency,
            merchant = %receipt.merchant_name,
            "printing receipt"
        );
        match self.terminal.print(receipt).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "receipt printing failed");
                false
            }
        }
    }

    pub async fn is_ready(&self) -> bool {
        *self.state.read().await == SessionState::Ready
    }
}
