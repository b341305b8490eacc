#![allow(dead_code)]

use hospi_bridge::application::bridge::Bridge;
use hospi_bridge::application::channels::PaymentDefaults;
use hospi_bridge::application::nfc_dispatcher::{NfcSettings, OverlapPolicy};
use hospi_bridge::domain::nfc::NfcLaunch;
use hospi_bridge::domain::ports::ProcessRestarter;
use hospi_bridge::infrastructure::channel_launcher::ChannelLauncher;
use hospi_bridge::infrastructure::simulated_terminal::SimulatedTerminal;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

/// Counts restarts instead of replacing the test process.
#[derive(Default)]
pub struct RecordingRestarter {
    restarts: AtomicUsize,
}

impl RecordingRestarter {
    pub fn count(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }
}

impl ProcessRestarter for RecordingRestarter {
    fn restart(&self) {
        self.restarts.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Harness {
    pub bridge: Bridge,
    pub launches: mpsc::UnboundedReceiver<NfcLaunch>,
    pub restarter: Arc<RecordingRestarter>,
}

pub fn harness_with(
    policy: OverlapPolicy,
    timeout: Option<Duration>,
    terminal: SimulatedTerminal,
) -> Harness {
    let (launcher, launches) = ChannelLauncher::new();
    let restarter = Arc::new(RecordingRestarter::default());
    let settings = NfcSettings {
        overlap_policy: policy,
        timeout,
        ..NfcSettings::default()
    };
    let bridge = Bridge::new(
        Box::new(launcher),
        Box::new(terminal),
        restarter.clone(),
        settings,
        PaymentDefaults::default(),
    );
    Harness {
        bridge,
        launches,
        restarter,
    }
}

pub fn harness() -> Harness {
    harness_with(OverlapPolicy::default(), None, SimulatedTerminal::new())
}

/// A `Write` sink the test can read back after the writer is moved away.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<std::sync::Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn lines(&self) -> Vec<serde_json::Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

impl std::io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
