use crate::domain::nfc::{CorrelationId, NfcCompletion, NfcLaunch, NfcMode, NfcOutcome, NFC_REQUEST_TAG};
use crate::domain::ports::NfcLauncherBox;
use crate::domain::response::{Responder, Response};
use crate::error::{BridgeError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What to do with an NFC request that arrives while another is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Fail the new request with `NFC_BUSY`.
    Reject,
    /// Hold the new request until the current one resolves. Once
    /// `max_queued` requests are waiting, further ones fail with `NFC_BUSY`.
    Queue,
    /// Resolve the current request with `NFC_SUPERSEDED` and start the new one.
    #[default]
    Supersede,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NfcSettings {
    pub request_tag: i32,
    pub overlap_policy: OverlapPolicy,
    pub timeout: Option<Duration>,
    pub max_queued: usize,
}

pub const DEFAULT_MAX_QUEUED: usize = 16;

impl Default for NfcSettings {
    fn default() -> Self {
        Self {
            request_tag: NFC_REQUEST_TAG,
            overlap_policy: OverlapPolicy::default(),
            timeout: None,
            max_queued: DEFAULT_MAX_QUEUED,
        }
    }
}

/// What happened to a completion handed to [`NfcDispatcher::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// The waiting caller received the result.
    Resolved(CorrelationId),
    /// Nothing was waiting for it.
    Dropped,
    /// Different request tag; left for other handlers.
    Unhandled,
}

struct Pending {
    id: CorrelationId,
    mode: NfcMode,
    responder: Responder,
}

struct Waiting {
    id: CorrelationId,
    mode: NfcMode,
    text: Option<String>,
    responder: Responder,
}

/// A queued request that has just taken the in-flight slot.
struct Promoted {
    id: CorrelationId,
    mode: NfcMode,
    text: Option<String>,
}

#[derive(Default)]
struct Slots {
    in_flight: Option<Pending>,
    queued: VecDeque<Waiting>,
}

struct Inner {
    launcher: NfcLauncherBox,
    settings: NfcSettings,
    next_id: AtomicU64,
    slots: Mutex<Slots>,
}

/// Correlates tag operations with the single completion each one produces.
///
/// At most one operation is in flight. Taking the pending caller out of the
/// slot and resolving it happen under the same lock acquisition, so a
/// caller is resolved exactly once no matter how many completions arrive.
#[derive(Clone)]
pub struct NfcDispatcher {
    inner: Arc<Inner>,
}

impl NfcDispatcher {
    /// Creates a dispatcher with nothing in flight.
    ///
    /// # Arguments
    ///
    /// * `launcher` - Starts tag operations on the reader.
    /// * `settings` - Request tag, overlap policy, queue bound and timeout.
    pub fn new(launcher: NfcLauncherBox, settings: NfcSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                launcher,
                settings,
                next_id: AtomicU64::new(1),
                slots: Mutex::new(Slots::default()),
            }),
        }
    }

    pub fn settings(&self) -> &NfcSettings {
        &self.inner.settings
    }

    /// Registers the caller and starts the tag operation.
    pub fn submit(&self, mode: NfcMode, text: Option<String>, responder: Responder) -> CorrelationId {
        let id = CorrelationId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));

        let displaced = {
            let mut slots = self.inner.slots.lock();
            let busy = slots.in_flight.is_some();
            let displaced = match (busy, self.inner.settings.overlap_policy) {
                (false, _) => None,
                (true, OverlapPolicy::Reject) => {
                    drop(slots);
                    warn!(correlation = %id, %mode, "rejecting overlapping NFC request");
                    responder.error(BridgeError::NfcBusy);
                    return id;
                }
                (true, OverlapPolicy::Queue) if slots.queued.len() >= self.inner.settings.max_queued => {
                    drop(slots);
                    warn!(correlation = %id, %mode, "NFC queue full, rejecting request");
                    responder.error(BridgeError::NfcBusy);
                    return id;
                }
                (true, OverlapPolicy::Queue) => {
                    slots.queued.push_back(Waiting {
                        id,
                        mode,
                        text,
                        responder,
                    });
                    debug!(correlation = %id, %mode, queued = slots.queued.len(), "queued NFC request");
                    return id;
                }
                (true, OverlapPolicy::Supersede) => slots.in_flight.take(),
            };
            slots.in_flight = Some(Pending { id, mode, responder });
            displaced
        };

        if let Some(old) = displaced {
            warn!(correlation = %old.id, mode = %old.mode, "NFC request superseded");
            old.responder.error(BridgeError::NfcSuperseded);
        }

        if let Err(e) = self.launch(id, mode, text) {
            self.fail_launch(id, e);
        }
        id
    }

    /// Feeds an asynchronous completion back in.
    pub fn complete(&self, completion: NfcCompletion) -> CompletionStatus {
        if completion.request_tag != self.inner.settings.request_tag {
            return CompletionStatus::Unhandled;
        }

        let result = match completion.outcome {
            NfcOutcome::Ok => Ok(completion.payload),
            NfcOutcome::Error => Err(BridgeError::Nfc(completion.payload)),
        };

        let status = self.finish(completion.correlation, result);
        if status == CompletionStatus::Dropped {
            debug!(correlation = ?completion.correlation, "dropping NFC completion with no pending request");
        }
        status
    }

    /// Resolves the in-flight operation with `NFC_CANCELLED`.
    pub fn cancel(&self) -> CompletionStatus {
        self.finish(None, Err(BridgeError::NfcCancelled))
    }

    pub fn is_busy(&self) -> bool {
        self.inner.slots.lock().in_flight.is_some()
    }

    /// The operation currently waiting on the reader, if any.
    pub fn in_flight(&self) -> Option<CorrelationId> {
        self.inner.slots.lock().in_flight.as_ref().map(|pending| pending.id)
    }

    pub fn queued(&self) -> usize {
        self.inner.slots.lock().queued.len()
    }

    fn launch(&self, id: CorrelationId, mode: NfcMode, text: Option<String>) -> Result<()> {
        info!(correlation = %id, %mode, "starting NFC operation");
        self.inner.launcher.launch(NfcLaunch {
            request_tag: self.inner.settings.request_tag,
            correlation: id,
            mode,
            text,
        })?;
        self.arm_timeout(id);
        Ok(())
    }

    fn fail_launch(&self, id: CorrelationId, e: BridgeError) {
        error!(correlation = %id, error = %e, "NFC launch failed");
        self.finish(Some(id), Err(e));
    }

    fn arm_timeout(&self, id: CorrelationId) {
        let Some(timeout) = self.inner.settings.timeout else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(correlation = %id, "no runtime available, NFC timeout not armed");
            return;
        };

        let dispatcher = self.clone();
        runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            if let CompletionStatus::Resolved(_) = dispatcher.finish(Some(id), Err(BridgeError::NfcTimeout(millis))) {
                warn!(correlation = %id, millis, "NFC operation timed out");
            }
        });
    }

    /// Resolves the matching caller, then launches queued requests until one
    /// starts. A launcher that keeps failing drains the queue in this loop.
    fn finish(&self, id: Option<CorrelationId>, result: Result<String>) -> CompletionStatus {
        let (status, mut next) = self.resolve(id, result);
        while let Some(Promoted { id, mode, text }) = next.take() {
            if let Err(e) = self.launch(id, mode, text) {
                error!(correlation = %id, error = %e, "NFC launch failed");
                next = self.resolve(Some(id), Err(e)).1;
            }
        }
        status
    }

    /// Takes the matching pending caller and promotes the next queued
    /// request under one lock, then replies outside it.
    fn resolve(&self, id: Option<CorrelationId>, result: Result<String>) -> (CompletionStatus, Option<Promoted>) {
        let (pending, next) = {
            let mut slots = self.inner.slots.lock();
            let matches = match (&slots.in_flight, id) {
                (Some(current), Some(id)) => current.id == id,
                (Some(_), None) => true,
                (None, _) => false,
            };
            if !matches {
                return (CompletionStatus::Dropped, None);
            }
            let Some(pending) = slots.in_flight.take() else {
                return (CompletionStatus::Dropped, None);
            };

            let next = slots.queued.pop_front().map(|waiting| {
                slots.in_flight = Some(Pending {
                    id: waiting.id,
                    mode: waiting.mode,
                    responder: waiting.responder,
                });
                Promoted {
                    id: waiting.id,
                    mode: waiting.mode,
                    text: waiting.text,
                }
            });
            (pending, next)
        };

        let resolved = pending.id;
        debug!(correlation = %resolved, mode = %pending.mode, ok = result.is_ok(), "resolving NFC request");
        pending.responder.send(match result {
            Ok(payload) => Response::success(payload),
            Err(e) => e.into(),
        });

        (CompletionStatus::Resolved(resolved), next)
    }
}
