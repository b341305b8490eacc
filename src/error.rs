use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("{0}")]
    Nfc(String),
    #[error("An NFC operation is already in progress")]
    NfcBusy,
    #[error("NFC operation replaced by a newer request")]
    NfcSuperseded,
    #[error("NFC operation timed out after {0} ms")]
    NfcTimeout(u64),
    #[error("NFC operation cancelled")]
    NfcCancelled,
    #[error("Failed to start NFC operation: {0}")]
    NfcLaunch(String),
    #[error("Payment terminal not initialized")]
    NotInitialized,
    #[error("Payment terminal error: {0}")]
    Terminal(String),
    #[error("Invalid argument '{key}': {reason}")]
    InvalidArgument { key: String, reason: String },
    #[error("Response channel closed before a reply was sent")]
    ChannelClosed,
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Stable code reported to the application shell.
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::Nfc(_) => "NFC_ERROR",
            BridgeError::NfcBusy => "NFC_BUSY",
            BridgeError::NfcSuperseded => "NFC_SUPERSEDED",
            BridgeError::NfcTimeout(_) => "NFC_TIMEOUT",
            BridgeError::NfcCancelled => "NFC_CANCELLED",
            BridgeError::NfcLaunch(_) => "NFC_LAUNCH_FAILED",
            BridgeError::NotInitialized => "NOT_INITIALIZED",
            BridgeError::Terminal(_) => "TERMINAL_ERROR",
            BridgeError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            BridgeError::ChannelClosed => "CHANNEL_CLOSED",
            BridgeError::Config(_) => "CONFIG_ERROR",
            BridgeError::Json(_) => "BAD_REQUEST",
            BridgeError::Io(_) => "IO_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
