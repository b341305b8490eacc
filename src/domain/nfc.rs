use serde::{Deserialize, Serialize};
use std::fmt;

/// Request tag identifying completions that belong to NFC operations.
pub const NFC_REQUEST_TAG: i32 = 1001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NfcMode {
    Read,
    Write,
    Erase,
    ReadAndErase,
}

impl NfcMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NfcMode::Read => "read",
            NfcMode::Write => "write",
            NfcMode::Erase => "erase",
            NfcMode::ReadAndErase => "readAndErase",
        }
    }
}

impl fmt::Display for NfcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier generated for each NFC request and echoed back by the launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CorrelationId(pub u64);

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nfc-{}", self.0)
    }
}

/// What the external tag subsystem receives when an operation starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NfcLaunch {
    pub request_tag: i32,
    pub correlation: CorrelationId,
    pub mode: NfcMode,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NfcOutcome {
    Ok,
    Error,
}

/// The single asynchronous result of a tag operation.
///
/// `correlation` is optional: a subsystem that does not echo the id is
/// matched against whatever request is currently in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NfcCompletion {
    pub request_tag: i32,
    pub correlation: Option<CorrelationId>,
    pub outcome: NfcOutcome,
    pub payload: String,
}

impl NfcCompletion {
    pub fn ok(launch: &NfcLaunch, payload: impl Into<String>) -> Self {
        Self {
            request_tag: launch.request_tag,
            correlation: Some(launch.correlation),
            outcome: NfcOutcome::Ok,
            payload: payload.into(),
        }
    }

    pub fn failed(launch: &NfcLaunch, payload: impl Into<String>) -> Self {
        Self {
            request_tag: launch.request_tag,
            correlation: Some(launch.correlation),
            outcome: NfcOutcome::Error,
            payload: payload.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_match_wire_format() {
        assert_eq!(NfcMode::ReadAndErase.to_string(), "readAndErase");
        assert_eq!(
            serde_json::to_string(&NfcMode::ReadAndErase).unwrap(),
            "\"readAndErase\""
        );
        assert_eq!(
            serde_json::from_str::<NfcMode>("\"write\"").unwrap(),
            NfcMode::Write
        );
    }

    #[test]
    fn test_completion_echoes_launch() {
        let launch = NfcLaunch {
            request_tag: NFC_REQUEST_TAG,
            correlation: CorrelationId(7),
            mode: NfcMode::Read,
            text: None,
        };
        let completion = NfcCompletion::failed(&launch, "No tag");
        assert_eq!(completion.request_tag, NFC_REQUEST_TAG);
        assert_eq!(completion.correlation, Some(CorrelationId(7)));
        assert_eq!(completion.outcome, NfcOutcome::Error);
    }
}
