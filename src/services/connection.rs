//! Framing layer shared by every station session.
//!
//! A socket is split into a [`ConnectionReader`] for the read-dispatch loop and
//! a cloneable [`ConnectionWriter`]. Writers never touch the socket directly:
//! every outbound frame is funnelled through one writer task, so the command
//! loop and the notifier relay cannot interleave partial writes.

use axum::extract::ws::{Message, WebSocket};
use futures::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use serde::Serialize;
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::warn;

use crate::{
    dto::ws::{InboundFrame, OutboundMessage},
    error::ProtocolError,
};

/// Why a read or write on a connection failed.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The remote end closed the connection, or the writer task is gone.
    #[error("connection closed")]
    Closed,
    /// The underlying socket failed.
    #[error("transport error: {0}")]
    Transport(#[from] axum::Error),
    /// A frame arrived that is not a valid envelope. The connection stays usable.
    #[error(transparent)]
    Malformed(#[from] ProtocolError),
    /// An outbound message could not be serialized; nothing was queued.
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Entry point for wrapping an upgraded socket.
pub struct Connection;

impl Connection {
    /// Split `socket` into its reading half, a writer handle and the writer task.
    ///
    /// `queue_depth` bounds the frames buffered ahead of the socket.
    pub fn split(
        socket: WebSocket,
        queue_depth: usize,
    ) -> (ConnectionReader, ConnectionWriter, WriterTask) {
        let (sink, stream) = socket.split();
        let (tx, rx) = mpsc::channel(queue_depth.max(1));
        let task = WriterTask(tokio::spawn(write_loop(sink, rx)));
        let writer = ConnectionWriter { tx };
        let reader = ConnectionReader {
            stream,
            writer: writer.clone(),
        };
        (reader, writer, task)
    }
}

/// Dedicated task that owns the socket sink.
pub struct WriterTask(JoinHandle<()>);

impl WriterTask {
    /// Drop the last writer handle and wait for queued frames to be flushed.
    ///
    /// The reader and every other [`ConnectionWriter`] clone must already be
    /// dropped, otherwise this waits for them.
    pub async fn finish(self, writer: ConnectionWriter) {
        drop(writer);
        let _ = self.0.await;
    }
}

async fn write_loop(mut sink: SplitSink<WebSocket, Message>, mut rx: mpsc::Receiver<Message>) {
    while let Some(message) = rx.recv().await {
        let closing = matches!(message, Message::Close(_));
        if let Err(err) = sink.send(message).await {
            warn!(error = %err, "websocket send failed");
            break;
        }
        if closing {
            break;
        }
    }
}

/// Reading half of a station connection.
pub struct ConnectionReader {
    stream: SplitStream<WebSocket>,
    writer: ConnectionWriter,
}

impl ConnectionReader {
    /// Wait for the next text frame and decode its envelope.
    ///
    /// Pings are answered transparently. A close frame is echoed back before
    /// [`ConnectionError::Closed`] is returned.
    pub async fn read_message(&mut self) -> Result<InboundFrame, ConnectionError> {
        loop {
            let message = match self.stream.next().await {
                Some(Ok(message)) => message,
                Some(Err(err)) => return Err(ConnectionError::Transport(err)),
                None => return Err(ConnectionError::Closed),
            };
            match message {
                Message::Text(text) => return Ok(InboundFrame::from_json_str(text.as_str())?),
                Message::Binary(_) => return Err(ProtocolError::Binary.into()),
                Message::Ping(payload) => {
                    let _ = self.writer.send(Message::Pong(payload)).await;
                }
                Message::Pong(_) => {}
                Message::Close(frame) => {
                    let _ = self.writer.send(Message::Close(frame)).await;
                    return Err(ConnectionError::Closed);
                }
            }
        }
    }
}

/// Cloneable handle for queueing outbound messages.
#[derive(Debug, Clone)]
pub struct ConnectionWriter {
    tx: mpsc::Sender<Message>,
}

impl ConnectionWriter {
    /// Serialize `message` and queue it for the writer task.
    pub async fn write_message(&self, message: &OutboundMessage) -> Result<(), ConnectionError> {
        self.send(encode(message)?).await
    }

    /// Write the reserved `error` message. The connection stays open.
    pub async fn write_error(&self, message: impl Into<String>) -> Result<(), ConnectionError> {
        self.write_message(&OutboundMessage::Error(message.into()))
            .await
    }

    async fn send(&self, message: Message) -> Result<(), ConnectionError> {
        self.tx
            .send(message)
            .await
            .map_err(|_| ConnectionError::Closed)
    }
}

fn encode<T: Serialize>(message: &T) -> Result<Message, ConnectionError> {
    let payload = serde_json::to_string(message).map_err(ConnectionError::Encode)?;
    Ok(Message::Text(payload.into()))
}
