use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::state::{
    SharedState,
    live::{KEEPALIVE_ACK, KEEPALIVE_PROBE, LiveSignal, SessionClosed, ViewerSink},
};

impl ViewerSink for mpsc::UnboundedSender<Message> {
    fn deliver(&self, signal: LiveSignal) -> Result<(), SessionClosed> {
        self.send(Message::Text(signal.as_text().into()))
            .map_err(|_| SessionClosed)
    }
}

/// Handle the full lifecycle of a live viewer WebSocket.
///
/// The socket is registered for broadcasts as soon as it opens and answers keepalive
/// probes until the peer closes it or a frame fails.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound messages flowing even while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let session_id = state.sessions().register(outbound_tx.clone()).await;
    info!(session_id = %session_id, "live viewer connected");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => match keepalive_reply(&text) {
                Some(reply) => {
                    if outbound_tx.send(Message::Text(reply.into())).is_err() {
                        break;
                    }
                }
                None => debug!(session_id = %session_id, payload = %text.as_str(), "ignoring viewer message"),
            },
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                info!(session_id = %session_id, "live viewer closed");
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "websocket error");
                break;
            }
        }
    }

    state.sessions().deregister(session_id).await;
    info!(session_id = %session_id, "live viewer disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Fixed reply to a keepalive probe; other text gets none.
fn keepalive_reply(text: &str) -> Option<&'static str> {
    (text.trim() == KEEPALIVE_PROBE).then_some(KEEPALIVE_ACK)
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
