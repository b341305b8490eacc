use super::nfc_dispatcher::NfcDispatcher;
use super::payment_gateway::PaymentGateway;
use super::router::MethodHandler;
use crate::domain::nfc::NfcMode;
use crate::domain::payment::{DEFAULT_CURRENCY, DEFAULT_MERCHANT_NAME, DEFAULT_PAYMENT_METHOD, Receipt};
use crate::domain::ports::ProcessRestarterRef;
use crate::domain::request::Request;
use crate::domain::response::Responder;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

pub const NFC_CHANNEL: &str = "com.hospi_id_scan.nfc";
pub const PAYMENT_CHANNEL: &str = "hospismart/payment";
pub const WATCHDOG_CHANNEL: &str = "hospismart/watchdog";

/// Tag operations. Each call parks its responder in the dispatcher until
/// the tag subsystem reports back.
pub struct NfcChannel {
    dispatcher: NfcDispatcher,
}

impl NfcChannel {
    pub fn new(dispatcher: NfcDispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl MethodHandler for NfcChannel {
    fn channel(&self) -> &str {
        NFC_CHANNEL
    }

    async fn handle(&self, request: Request, responder: Responder) {
        let (mode, text) = match request.method.as_str() {
            "readTag" => (NfcMode::Read, None),
            "writeTag" => (NfcMode::Write, Some(request.str_or("text", ""))),
            "eraseTag" => (NfcMode::Erase, None),
            "readAndEraseTag" => (NfcMode::ReadAndErase, None),
            _ => return responder.not_implemented(),
        };
        self.dispatcher.submit(mode, text, responder);
    }
}

/// Fallbacks for payment arguments the caller leaves out.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDefaults {
    pub currency: String,
    pub payment_method: String,
    pub merchant_name: String,
}

impl Default for PaymentDefaults {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
            merchant_name: DEFAULT_MERCHANT_NAME.to_string(),
        }
    }
}

/// Payment terminal operations. Every call is answered as soon as the
/// gateway returns.
pub struct PaymentChannel {
    gateway: Arc<PaymentGateway>,
    defaults: PaymentDefaults,
}

impl PaymentChannel {
    pub fn new(gateway: Arc<PaymentGateway>, defaults: PaymentDefaults) -> Self {
        Self { gateway, defaults }
    }

    async fn process_payment(&self, request: &Request) -> Result<serde_json::Value> {
        let amount = request.decimal_or("amount", Decimal::ZERO)?;
        let currency = request.str_or("currency", &self.defaults.currency);
        let method = request.str_or("paymentMethod", &self.defaults.payment_method);

        let outcome = self.gateway.process_payment(amount, &currency, &method).await?;
        Ok(serde_json::to_value(outcome)?)
    }

    fn receipt(&self, request: &Request) -> Result<Receipt> {
        Ok(Receipt {
            transaction_id: request.str_or("transactionId", ""),
            amount: request.decimal_or("amount", Decimal::ZERO)?,
            currency: request.str_or("currency", &self.defaults.currency),
            card_type: request.opt_str("cardType").map(str::to_string),
            card_number: request.opt_str("cardNumber").map(str::to_string),
            merchant_name: request.str_or("merchantName", &self.defaults.merchant_name),
            timestamp: request.str_or("timestamp", ""),
        })
    }
}

#[async_trait]
impl MethodHandler for PaymentChannel {
    fn channel(&self) -> &str {
        PAYMENT_CHANNEL
    }

    async fn handle(&self, request: Request, responder: Responder) {
        match request.method.as_str() {
            "initialize" => responder.success(self.gateway.initialize().await),
            "processPayment" => match self.process_payment(&request).await {
                Ok(value) => responder.success(value),
                Err(e) => responder.error(e),
            },
            "cancelPayment" => responder.success(self.gateway.cancel_payment().await),
            "printReceipt" => match self.receipt(&request) {
                Ok(receipt) => responder.success(self.gateway.print_receipt(&receipt).await),
                Err(e) => responder.error(e),
            },
            "isReady" => responder.success(self.gateway.is_ready().await),
            _ => responder.not_implemented(),
        }
    }
}

/// Process lifecycle commands.
pub struct LifecycleChannel {
    restarter: ProcessRestarterRef,
}

impl LifecycleChannel {
    pub fn new(restarter: ProcessRestarterRef) -> Self {
        Self { restarter }
    }
}

#[async_trait]
impl MethodHandler for LifecycleChannel {
    fn channel(&self) -> &str {
        WATCHDOG_CHANNEL
    }

    async fn handle(&self, request: Request, responder: Responder) {
        match request.method.as_str() {
            "restartApp" => {
                // Reply first: the restart below does not return.
                responder.success(true);
                info!("restarting process");
                self.restarter.restart();
            }
            _ => responder.not_implemented(),
        }
    }
}
