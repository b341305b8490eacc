use crate::application::nfc_dispatcher::{CompletionStatus, NfcDispatcher};
use crate::domain::nfc::{NfcCompletion, NfcLaunch, NfcMode};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub const NO_TAG_MESSAGE: &str = "No tag detected";

/// An in-memory tag standing in for the real reader.
///
/// Consumes launches in order and reports each result through the
/// dispatcher, the same way the hardware callback would. Launches whose
/// caller was already answered are not performed.
#[derive(Debug, Clone, Default)]
pub struct SimulatedNfcDevice {
    tag: Option<String>,
    latency: Duration,
}

impl SimulatedNfcDevice {
    /// A reader with no tag in the field: every operation fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_tag(content: impl Into<String>) -> Self {
        Self {
            tag: Some(content.into()),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn perform(&mut self, launch: &NfcLaunch) -> NfcCompletion {
        let Some(content) = self.tag.as_mut() else {
            return NfcCompletion::failed(launch, NO_TAG_MESSAGE);
        };

        let payload = match launch.mode {
            NfcMode::Read => content.clone(),
            NfcMode::Write => {
                *content = launch.text.clone().unwrap_or_default();
                content.clone()
            }
            NfcMode::Erase => {
                content.clear();
                String::new()
            }
            NfcMode::ReadAndErase => std::mem::take(content),
        };
        NfcCompletion::ok(launch, payload)
    }

    /// Runs until the launcher side is dropped.
    pub async fn run(mut self, mut launches: mpsc::UnboundedReceiver<NfcLaunch>, dispatcher: NfcDispatcher) {
        info!(tag_present = self.tag.is_some(), "simulated NFC reader started");
        while let Some(launch) = launches.recv().await {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            if dispatcher.in_flight() != Some(launch.correlation) {
                debug!(correlation = %launch.correlation, "skipping launch that is no longer in flight");
                continue;
            }
            let completion = self.perform(&launch);
            match dispatcher.complete(completion) {
                CompletionStatus::Resolved(id) => debug!(correlation = %id, "tag operation delivered"),
                status => debug!(?status, correlation = %launch.correlation, "tag operation not delivered"),
            }
        }
        info!("simulated NFC reader stopped");
    }
}
