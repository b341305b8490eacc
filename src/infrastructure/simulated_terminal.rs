use crate::domain::payment::{CardAuthorization, ChargeRequest, Receipt};
use crate::domain::ports::PaymentTerminal;
use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use tracing::debug;

pub const SIMULATED_CARD_TYPE: &str = "VISA";
pub const SIMULATED_CARD_NUMBER: &str = "************1234";

/// A terminal that approves everything with fixed placeholder card data.
///
/// `failing` and `decline_charges` make it fault on demand so the
/// gateway's error folding can be exercised without hardware.
#[derive(Debug, Clone, Default)]
pub struct SimulatedTerminal {
    fault: Option<String>,
    decline: Option<String>,
}

impl SimulatedTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fault: Some(message.into()),
            decline: None,
        }
    }

    /// Only charges fail with `message`.
    pub fn decline_charges(mut self, message: impl Into<String>) -> Self {
        self.decline = Some(message.into());
        self
    }

    fn check(&self) -> Result<()> {
        match &self.fault {
            Some(message) => Err(BridgeError::Terminal(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PaymentTerminal for SimulatedTerminal {
    async fn connect(&self) -> Result<()> {
        self.check()
    }

    async fn charge(&self, request: &ChargeRequest) -> Result<CardAuthorization> {
        self.check()?;
        if let Some(message) = &self.decline {
            return Err(BridgeError::Terminal(message.clone()));
        }
        debug!(amount = %request.amount, currency = %request.currency, "simulated charge approved");
        Ok(CardAuthorization {
            card_type: SIMULATED_CARD_TYPE.to_string(),
            card_number_masked: SIMULATED_CARD_NUMBER.to_string(),
        })
    }

    async fn cancel(&self) -> Result<()> {
        self.check()
    }

    async fn print(&self, receipt: &Receipt) -> Result<()> {
        self.check()?;
        debug!(transaction_id = %receipt.transaction_id, "simulated receipt printed");
        Ok(())
    }
}
