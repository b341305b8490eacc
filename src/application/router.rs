use crate::domain::request::Request;
use crate::domain::response::{Responder, Response};
use crate::error::BridgeError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Handles every method call arriving on one named channel.
///
/// A handler must reply through the responder exactly once, or hand it to
/// something that will. Unknown methods get `not_implemented`.
#[async_trait]
pub trait MethodHandler: Send + Sync {
    fn channel(&self) -> &str;
    async fn handle(&self, request: Request, responder: Responder);
}

pub type MethodHandlerRef = Arc<dyn MethodHandler>;

/// The front door: routes named requests to the handler of their channel.
#[derive(Default, Clone)]
pub struct RequestRouter {
    handlers: HashMap<String, MethodHandlerRef>,
}

impl RequestRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under its channel name, replacing any previous one.
    pub fn register(&mut self, handler: MethodHandlerRef) -> &mut Self {
        self.handlers.insert(handler.channel().to_string(), handler);
        self
    }

    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub async fn dispatch(&self, channel: &str, request: Request, responder: Responder) {
        match self.handlers.get(channel) {
            Some(handler) => {
                debug!(channel, method = %request.method, "dispatching request");
                handler.handle(request, responder).await;
            }
            None => {
                warn!(channel, method = %request.method, "request on unknown channel");
                responder.not_implemented();
            }
        }
    }

    /// Dispatches and waits for the reply.
    pub async fn call(&self, channel: &str, request: Request) -> Response {
        let (responder, rx) = Responder::channel();
        self.dispatch(channel, request, responder).await;
        rx.await.unwrap_or_else(|_| BridgeError::ChannelClosed.into())
    }
}
