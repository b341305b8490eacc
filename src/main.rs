use clap::Parser;
use hospi_bridge::application::bridge::Bridge;
use hospi_bridge::application::nfc_dispatcher::OverlapPolicy;
use hospi_bridge::config::BridgeConfig;
use hospi_bridge::infrastructure::channel_launcher::ChannelLauncher;
use hospi_bridge::infrastructure::process_restart::ProcessRestart;
use hospi_bridge::infrastructure::simulated_nfc::SimulatedNfcDevice;
use hospi_bridge::infrastructure::simulated_terminal::SimulatedTerminal;
use hospi_bridge::interfaces::jsonl::server;
use hospi_bridge::logging::{LogFormat, init_logging};
use miette::{IntoDiagnostic, Result};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;

/// Serves NFC and payment requests as JSON lines on stdin/stdout.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// What to do with an NFC request while another is in flight
    #[arg(long, value_enum)]
    overlap_policy: Option<OverlapPolicy>,

    /// Fail NFC requests that get no result within this many milliseconds
    #[arg(long)]
    nfc_timeout_ms: Option<u64>,

    /// Content of the simulated tag. Without it the reader sees no tag.
    #[arg(long)]
    tag: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut BridgeConfig) {
        if let Some(level) = self.log_level {
            config.logging.level = Some(level);
        }
        if let Some(format) = self.log_format {
            config.logging.format = Some(format);
        }
        if let Some(policy) = self.overlap_policy {
            config.nfc.overlap_policy = Some(policy);
        }
        if let Some(timeout) = self.nfc_timeout_ms {
            config.nfc.timeout_ms = Some(timeout);
        }
        if let Some(tag) = self.tag {
            config.simulator.tag = Some(tag);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => BridgeConfig::load(path).into_diagnostic()?,
        None => BridgeConfig::default(),
    };
    cli.apply(&mut config);
    init_logging(config.log_level(), config.log_format());

    let terminal = match &config.simulator.terminal_fault {
        Some(fault) => SimulatedTerminal::failing(fault.clone()),
        None => SimulatedTerminal::new(),
    };
    let (launcher, launches) = ChannelLauncher::new();
    let bridge = Bridge::new(
        Box::new(launcher),
        Box::new(terminal),
        Arc::new(ProcessRestart::new()),
        config.nfc_settings(),
        config.payment_defaults(),
    );

    let device = match config.simulator.tag.clone() {
        Some(content) => SimulatedNfcDevice::with_tag(content),
        None => SimulatedNfcDevice::empty(),
    }
    .with_latency(config.simulator_latency());
    let reader = tokio::spawn(device.run(launches, bridge.nfc.clone()));

    let stdin = BufReader::new(tokio::io::stdin());
    let summary = server::serve(bridge.router, stdin, io::stdout()).await;
    tracing::debug!(?summary, "shutting down");

    // The reader shares the dispatcher, so its launch channel never closes on its own.
    reader.abort();
    Ok(())
}
