use crate::domain::request::{ArgValue, Request};
use crate::error::BridgeError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// One line of input: a request addressed to a channel.
///
/// `id` is opaque to the bridge and echoed back on the response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub id: Option<Value>,
    pub channel: String,
    pub method: String,
    #[serde(default)]
    pub arguments: HashMap<String, ArgValue>,
}

impl RequestEnvelope {
    pub fn into_parts(self) -> (Option<Value>, String, Request) {
        let request = Request {
            method: self.method,
            arguments: self.arguments,
        };
        (self.id, self.channel, request)
    }
}

/// A line that could not be turned into a request.
///
/// `id` is set whenever the line was a JSON object carrying one, so the
/// rejection still reaches the caller that sent it.
#[derive(Debug)]
pub struct RejectedLine {
    pub id: Option<Value>,
    pub error: BridgeError,
}

pub type LineResult = std::result::Result<RequestEnvelope, RejectedLine>;

/// Parses a single input line.
pub fn parse_line(line: &str) -> LineResult {
    let value: Value = serde_json::from_str(line).map_err(|e| RejectedLine {
        id: None,
        error: e.into(),
    })?;
    let id = value.get("id").filter(|id| !id.is_null()).cloned();
    serde_json::from_value(value).map_err(|e| RejectedLine { id, error: e.into() })
}

/// Reads request envelopes, one JSON object per line.
///
/// Blank lines are skipped. A malformed line yields a rejection and reading
/// carries on with the next line. A read error ends the stream after it has
/// been reported.
pub struct RequestReader<R> {
    lines: Lines<R>,
    failed: bool,
}

impl<R: AsyncBufRead + Unpin> RequestReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            lines: source.lines(),
            failed: false,
        }
    }

    /// Returns `None` once the input is exhausted.
    pub async fn next_request(&mut self) -> Option<LineResult> {
        if self.failed {
            return None;
        }
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => return Some(parse_line(&line)),
                Ok(None) => return None,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(RejectedLine {
                        id: None,
                        error: e.into(),
                    }));
                }
            }
        }
    }
}
