use crate::error::BridgeError;
use serde_json::Value;
use std::fmt;
use tokio::sync::oneshot;

/// The outcome delivered back to a caller.
///
/// `NotImplemented` is deliberately a separate variant: an unsupported
/// method is neither a success nor a failure of the operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Success(Value),
    Error { code: String, message: String },
    NotImplemented,
}

impl Response {
    pub fn success(value: impl Into<Value>) -> Self {
        Response::Success(value.into())
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Response::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }
}

impl From<BridgeError> for Response {
    fn from(err: BridgeError) -> Self {
        Response::error(err.code(), err.to_string())
    }
}

/// The handle a caller is waiting on.
///
/// Every reply method takes `self`, so a responder can reply at most once.
pub struct Responder {
    reply: Box<dyn FnOnce(Response) + Send>,
}

impl Responder {
    /// Wraps a callback invoked with the reply.
    pub fn new<F>(reply: F) -> Self
    where
        F: FnOnce(Response) + Send + 'static,
    {
        Self {
            reply: Box::new(reply),
        }
    }

    /// A responder paired with a receiver the caller can await.
    pub fn channel() -> (Self, oneshot::Receiver<Response>) {
        let (tx, rx) = oneshot::channel();
        let responder = Self::new(move |response| {
            // The receiver may have given up waiting; nothing to do then.
            let _ = tx.send(response);
        });
        (responder, rx)
    }

    pub fn send(self, response: Response) {
        (self.reply)(response)
    }

    pub fn success(self, value: impl Into<Value>) {
        self.send(Response::success(value))
    }

    pub fn error(self, err: BridgeError) {
        self.send(err.into())
    }

    pub fn not_implemented(self) {
        self.send(Response::NotImplemented)
    }
}

impl fmt::Debug for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder").finish_non_exhaustive()
    }
}
