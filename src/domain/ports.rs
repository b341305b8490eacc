use super::nfc::NfcLaunch;
use super::payment::{CardAuthorization, ChargeRequest, Receipt};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Starts an out-of-process tag operation. Fire-and-forget: the result
/// comes back later through `NfcDispatcher::complete`.
///
/// A launch that cannot be started should fail with `BridgeError::NfcLaunch`.
pub trait NfcLauncher: Send + Sync {
    fn launch(&self, launch: NfcLaunch) -> Result<()>;
}

#[async_trait]
pub trait PaymentTerminal: Send + Sync {
    async fn connect(&self) -> Result<()>;
    async fn charge(&self, request: &ChargeRequest) -> Result<CardAuthorization>;
    async fn cancel(&self) -> Result<()>;
    async fn print(&self, receipt: &Receipt) -> Result<()>;
}

/// Relaunches the current process. Implementations are not expected to return.
pub trait ProcessRestarter: Send + Sync {
    fn restart(&self);
}

pub type NfcLauncherBox = Box<dyn NfcLauncher>;
pub type PaymentTerminalBox = Box<dyn PaymentTerminal>;
pub type ProcessRestarterRef = Arc<dyn ProcessRestarter>;
