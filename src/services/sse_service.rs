use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

use crate::state::{
    SharedState,
    live::{LiveSignal, SessionClosed, ViewerSink},
};

/// Frames buffered per SSE client before further signals are folded into the queued one.
const STREAM_BUFFER: usize = 8;

/// Live session backed by an SSE response stream.
struct SseSink {
    tx: mpsc::Sender<Result<Event, Infallible>>,
}

impl ViewerSink for SseSink {
    fn deliver(&self, signal: LiveSignal) -> Result<(), SessionClosed> {
        let event = Event::default()
            .event(signal.as_text())
            .data(signal.as_text());
        match self.tx.try_send(Ok(event)) {
            Ok(()) => Ok(()),
            // an unread "update" is already queued for this client
            Err(TrySendError::Full(_)) => Ok(()),
            Err(TrySendError::Closed(_)) => Err(SessionClosed),
        }
    }
}

/// Register a one-way live session and return its event stream.
///
/// Unlike WebSocket viewers, SSE sessions are reaped as soon as the transport closes
/// instead of on the next failed send.
pub async fn subscribe_live(
    state: &SharedState,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + use<>> {
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(STREAM_BUFFER);
    let session_id = state
        .sessions()
        .register(SseSink { tx: tx.clone() })
        .await;
    info!(session_id = %session_id, "live SSE viewer connected");

    // axum drops the stream on disconnect, which closes the channel and reaps the session
    let cleanup = state.clone();
    tokio::spawn(async move {
        tx.closed().await;
        cleanup.sessions().deregister(session_id).await;
        info!(session_id = %session_id, "live SSE viewer disconnected");
    });

    Sse::new(ReceiverStream::new(rx)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
