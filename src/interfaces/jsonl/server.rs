use super::request_reader::{RejectedLine, RequestReader};
use super::response_writer::ResponseWriter;
use crate::application::router::RequestRouter;
use crate::domain::response::{Responder, Response};
use crate::error::BridgeError;
use parking_lot::Mutex;
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;
use tokio::io::AsyncBufRead;
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServeSummary {
    pub dispatched: usize,
    pub rejected: usize,
}

type SharedWriter<W> = Arc<Mutex<ResponseWriter<W>>>;

fn write_line<W: Write>(writer: &SharedWriter<W>, id: Option<&Value>, response: &Response) {
    if let Err(e) = writer.lock().write_response(id, response) {
        error!(error = %e, "failed to write response");
    }
}

/// Serves JSON-lines requests from `input` until it is exhausted.
///
/// Each request runs on its own task so a parked NFC call does not hold up
/// the lines behind it. Replies are written from the responder itself,
/// which means a reply is on the wire before any side effect that follows
/// it (a restart, for instance). Returns once every request has been
/// answered.
///
/// A line that cannot be parsed is answered with `BAD_REQUEST`, echoing its
/// `id` when the line carried one.
pub async fn serve<R, W>(router: RequestRouter, input: R, output: W) -> ServeSummary
where
    R: AsyncBufRead + Unpin,
    W: Write + Send + 'static,
{
    let router = Arc::new(router);
    let writer: SharedWriter<W> = Arc::new(Mutex::new(ResponseWriter::new(output)));
    let mut tasks = JoinSet::new();
    let mut summary = ServeSummary::default();

    let mut reader = RequestReader::new(input);
    while let Some(item) = reader.next_request().await {
        let envelope = match item {
            Ok(envelope) => envelope,
            Err(RejectedLine { id, error }) => {
                warn!(?id, error = %error, "rejecting malformed request");
                summary.rejected += 1;
                write_line(&writer, id.as_ref(), &error.into());
                continue;
            }
        };

        summary.dispatched += 1;
        let (id, channel, request) = envelope.into_parts();
        let router = router.clone();
        let writer = writer.clone();
        tasks.spawn(async move {
            let (done_tx, done_rx) = oneshot::channel::<()>();
            let reply_writer = writer.clone();
            let reply_id = id.clone();
            let responder = Responder::new(move |response| {
                write_line(&reply_writer, reply_id.as_ref(), &response);
                let _ = done_tx.send(());
            });

            router.dispatch(&channel, request, responder).await;

            if done_rx.await.is_err() {
                write_line(&writer, id.as_ref(), &BridgeError::ChannelClosed.into());
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "request task failed");
        }
    }

    info!(
        dispatched = summary.dispatched,
        rejected = summary.rejected,
        "input exhausted"
    );
    summary
}
