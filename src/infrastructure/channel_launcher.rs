use crate::domain::nfc::NfcLaunch;
use crate::domain::ports::NfcLauncher;
use crate::error::{BridgeError, Result};
use tokio::sync::mpsc;

/// Hands launches to whatever task drives the tag hardware.
#[derive(Clone)]
pub struct ChannelLauncher {
    sender: mpsc::UnboundedSender<NfcLaunch>,
}

impl ChannelLauncher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NfcLaunch>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NfcLauncher for ChannelLauncher {
    fn launch(&self, launch: NfcLaunch) -> Result<()> {
        self.sender
            .send(launch)
            .map_err(|_| BridgeError::NfcLaunch("tag subsystem is not running".to_string()))
    }
}
