//! # Configuration
//!
//! Settings resolve as: built-in defaults, then the TOML file, then CLI
//! flags. Every field is optional so a config file only needs the keys it
//! wants to change.
//!
//! ```toml
//! [nfc]
//! overlap_policy = "queue"   # reject | queue | supersede
//! timeout_ms = 30000         # 0 or absent: wait forever
//! max_queued = 16            # waiting requests allowed under "queue"
//!
//! [payment]
//! merchant_name = "HospiSmart Hotel"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use crate::application::channels::PaymentDefaults;
use crate::application::nfc_dispatcher::{NfcSettings, OverlapPolicy};
use crate::error::Result;
use crate::logging::LogFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub nfc: NfcConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct NfcConfig {
    pub request_tag: Option<i32>,
    pub overlap_policy: Option<OverlapPolicy>,
    pub timeout_ms: Option<u64>,
    pub max_queued: Option<usize>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct PaymentConfig {
    pub currency: Option<String>,
    pub payment_method: Option<String>,
    pub merchant_name: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

/// Knobs for the simulated devices the binary runs with.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulatorConfig {
    /// Initial tag content. Absent means no tag in the field.
    pub tag: Option<String>,
    pub latency_ms: Option<u64>,
    /// Makes every terminal operation fail with this message.
    pub terminal_fault: Option<String>,
}

impl BridgeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let raw = fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn nfc_settings(&self) -> NfcSettings {
        let defaults = NfcSettings::default();
        NfcSettings {
            request_tag: self.nfc.request_tag.unwrap_or(defaults.request_tag),
            overlap_policy: self.nfc.overlap_policy.unwrap_or(defaults.overlap_policy),
            timeout: self
                .nfc
                .timeout_ms
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
            max_queued: self.nfc.max_queued.unwrap_or(defaults.max_queued),
        }
    }

    pub fn payment_defaults(&self) -> PaymentDefaults {
        let defaults = PaymentDefaults::default();
        PaymentDefaults {
            currency: self.payment.currency.clone().unwrap_or(defaults.currency),
            payment_method: self
                .payment
                .payment_method
                .clone()
                .unwrap_or(defaults.payment_method),
            merchant_name: self
                .payment
                .merchant_name
                .clone()
                .unwrap_or(defaults.merchant_name),
        }
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging.format.unwrap_or_default()
    }

    pub fn simulator_latency(&self) -> Duration {
        Duration::from_millis(self.simulator.latency_ms.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::nfc_dispatcher::DEFAULT_MAX_QUEUED;
    use crate::domain::nfc::NFC_REQUEST_TAG;
    use crate::error::BridgeError;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = BridgeConfig::parse("").unwrap();

        let nfc = config.nfc_settings();
        assert_eq!(nfc.request_tag, NFC_REQUEST_TAG);
        assert_eq!(nfc.overlap_policy, OverlapPolicy::Supersede);
        assert_eq!(nfc.timeout, None);
        assert_eq!(nfc.max_queued, DEFAULT_MAX_QUEUED);

        let payment = config.payment_defaults();
        assert_eq!(payment.currency, "EUR");
        assert_eq!(payment.payment_method, "any");
        assert_eq!(payment.merchant_name, "HospiSmart Hotel");

        assert_eq!(config.log_level(), "info");
        assert_eq!(config.log_format(), LogFormat::Pretty);
    }

    #[test]
    fn test_sparse_overrides() {
        let raw = r#"
            [nfc]
            overlap_policy = "queue"
            timeout_ms = 1500
            max_queued = 4

            [payment]
            merchant_name = "Grand Budapest"

            [logging]
            format = "json"
        "#;
        let config = BridgeConfig::parse(raw).unwrap();

        let nfc = config.nfc_settings();
        assert_eq!(nfc.overlap_policy, OverlapPolicy::Queue);
        assert_eq!(nfc.timeout, Some(Duration::from_millis(1500)));
        assert_eq!(nfc.max_queued, 4);
        assert_eq!(config.payment_defaults().merchant_name, "Grand Budapest");
        assert_eq!(config.payment_defaults().currency, "EUR");
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config = BridgeConfig::parse("[nfc]\ntimeout_ms = 0").unwrap();
        assert_eq!(config.nfc_settings().timeout, None);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result = BridgeConfig::parse("[nfc]\noverlap_policy = \"whatever\"");
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[simulator]\ntag = \"ROOM-101\"\nlatency_ms = 5").unwrap();

        let config = BridgeConfig::load(file.path()).unwrap();
        assert_eq!(config.simulator.tag.as_deref(), Some("ROOM-101"));
        assert_eq!(config.simulator_latency(), Duration::from_millis(5));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = BridgeConfig::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(BridgeError::Io(_))));
    }
}
