use crate::error::{BridgeError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// A single argument value as sent by the application shell.
///
/// An explicit `null` reads the same as a missing argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Text(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Number(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

/// A named method call with its argument bag.
///
/// Requests only live for the duration of one dispatch; handlers pull the
/// arguments they need through the typed accessors and fall back to defaults
/// for anything missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    #[serde(default)]
    pub arguments: HashMap<String, ArgValue>,
}

impl Request {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: HashMap::new(),
        }
    }

    /// Builder-style helper used by callers assembling a request in code.
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Returns the argument as text, if present and a string.
    pub fn opt_str(&self, key: &str) -> Option<&str> {
        match self.arguments.get(key) {
            Some(ArgValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn str_or(&self, key: &str, default: &str) -> String {
        self.opt_str(key).unwrap_or(default).to_string()
    }

    /// Reads a decimal argument. Numbers and numeric strings are accepted.
    pub fn decimal_or(&self, key: &str, default: Decimal) -> Result<Decimal> {
        match self.arguments.get(key) {
            None | Some(ArgValue::Null) => Ok(default),
            Some(ArgValue::Number(n)) => {
                Decimal::from_f64(*n).ok_or_else(|| BridgeError::InvalidArgument {
                    key: key.to_string(),
                    reason: format!("{n} is not a representable amount"),
                })
            }
            Some(ArgValue::Text(s)) => {
                Decimal::from_str(s.trim()).map_err(|e| BridgeError::InvalidArgument {
                    key: key.to_string(),
                    reason: e.to_string(),
                })
            }
            Some(ArgValue::Bool(_)) => Err(BridgeError::InvalidArgument {
                key: key.to_string(),
                reason: "expected a number".to_string(),
            }),
        }
    }
}
