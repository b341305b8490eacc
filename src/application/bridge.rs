use super::channels::{LifecycleChannel, NfcChannel, PaymentChannel, PaymentDefaults};
use super::nfc_dispatcher::{NfcDispatcher, NfcSettings};
use super::payment_gateway::PaymentGateway;
use super::router::RequestRouter;
use crate::domain::ports::{NfcLauncherBox, PaymentTerminalBox, ProcessRestarterRef};
use std::sync::Arc;

/// Everything one process needs to answer the application shell.
///
/// Constructed once; the dispatcher is kept alongside the router because
/// NFC completions arrive through it rather than through a request.
pub struct Bridge {
    pub router: RequestRouter,
    pub nfc: NfcDispatcher,
    pub payments: Arc<PaymentGateway>,
}

impl Bridge {
    /// Wires the ports into the dispatcher, the gateway and the router.
    ///
    /// # Arguments
    ///
    /// * `launcher` - Starts tag operations on the reader.
    /// * `terminal` - The payment terminal.
    /// * `restarter` - Relaunches the process on `restartApp`.
    /// * `nfc_settings` - Overlap policy, queue bound and timeout for tag operations.
    /// * `payment_defaults` - Fallbacks for omitted payment arguments.
    pub fn new(
        launcher: NfcLauncherBox,
        terminal: PaymentTerminalBox,
        restarter: ProcessRestarterRef,
        nfc_settings: NfcSettings,
        payment_defaults: PaymentDefaults,
    ) -> Self {
        let nfc = NfcDispatcher::new(launcher, nfc_settings);
        let payments = Arc::new(PaymentGateway::new(terminal));

        let mut router = RequestRouter::new();
        router
            .register(Arc::new(NfcChannel::new(nfc.clone())))
            .register(Arc::new(PaymentChannel::new(payments.clone(), payment_defaults)))
            .register(Arc::new(LifecycleChannel::new(restarter)));

        Self {
            router,
            nfc,
            payments,
        }
    }
}
