//! Push channel connection.
//!
//! A [`PushConnection`] keeps one WebSocket open to the relay, hands every
//! incoming event to an injected [`PushHandler`] and sends outgoing change
//! events queued through its [`PushPublisher`].
//!
//! Events reach the handler one at a time and in arrival order on a separate
//! task, so a slow `on_event` never holds back outgoing frames or pings.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{SinkExt as _, StreamExt as _};
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, Message},
};
use tracing::{debug, info, warn};

/// Event name for changes published by a client.
pub const PRODUCT_UPDATE_EVENT: &str = "product-update";

/// Event name for changes delivered by the relay.
pub const PRODUCT_UPDATED_EVENT: &str = "product-updated";

/// A push channel frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushFrame {
    pub event: String,

    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("failed to open push channel")]
    Connect(#[source] Box<tungstenite::Error>),

    #[error("push channel transport failure")]
    Transport(#[source] Box<tungstenite::Error>),

    #[error("push channel is closed")]
    Closed,

    #[error("failed to encode push frame")]
    Encode(#[source] serde_json::Error),
}

/// Callbacks for push channel lifecycle and events.
#[async_trait]
pub trait PushHandler: Send + Sync {
    async fn on_open(&self) {}

    async fn on_event(&self, frame: PushFrame);

    async fn on_close(&self) {}

    async fn on_error(&self, _error: &PushError) {}
}

/// Something that can announce a product change to other clients.
#[automock]
pub trait ChangePublisher: Send + Sync {
    /// Queue a `product-update` event carrying `payload`.
    ///
    /// # Errors
    ///
    /// Fails when the frame cannot be encoded or the channel is gone.
    fn publish_change(&self, payload: Value) -> Result<(), PushError>;
}

#[derive(Debug)]
enum Outgoing {
    Frame(String),
    Close,
}

/// Sending half of a push connection.
#[derive(Debug, Clone)]
pub struct PushPublisher {
    outgoing: mpsc::UnboundedSender<Outgoing>,
}

impl ChangePublisher for PushPublisher {
    fn publish_change(&self, payload: Value) -> Result<(), PushError> {
        let frame = serde_json::to_string(&PushFrame {
            event: PRODUCT_UPDATE_EVENT.to_owned(),
            data: payload,
        })
        .map_err(PushError::Encode)?;

        self.outgoing
            .send(Outgoing::Frame(frame))
            .map_err(|_closed| PushError::Closed)
    }
}

/// An open push channel.
#[derive(Debug)]
pub struct PushConnection {
    publisher: PushPublisher,
    task: JoinHandle<()>,
}

impl PushConnection {
    /// Open the push channel at `url` and start delivering events to `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`PushError::Connect`] when the WebSocket handshake fails.
    pub async fn connect(url: &str, handler: Arc<dyn PushHandler>) -> Result<Self, PushError> {
        let (stream, _response) = connect_async(url)
            .await
            .map_err(|source| PushError::Connect(Box::new(source)))?;

        info!(url, "push channel open");

        handler.on_open().await;

        let (outgoing, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(stream, receiver, handler));

        Ok(Self {
            publisher: PushPublisher { outgoing },
            task,
        })
    }

    #[must_use]
    pub fn publisher(&self) -> PushPublisher {
        self.publisher.clone()
    }

    /// Send any queued frames, close the channel and wait for it to finish.
    pub async fn close(self) {
        if self.publisher.outgoing.send(Outgoing::Close).is_err() {
            debug!("push channel already closed");
        }

        self.closed().await;
    }

    /// Wait until the channel is closed by either side.
    pub async fn closed(self) {
        if let Err(error) = self.task.await {
            warn!("push channel task failed: {error}");
        }
    }
}

async fn run<S>(
    stream: S,
    mut outgoing: mpsc::UnboundedReceiver<Outgoing>,
    handler: Arc<dyn PushHandler>,
) where
    S: futures_util::Stream<Item = Result<Message, tungstenite::Error>>
        + futures_util::Sink<Message, Error = tungstenite::Error>
        + Unpin,
{
    let (mut sink, mut incoming) = stream.split();
    let mut publishers_alive = true;

    let (events, mut queued_events) = mpsc::unbounded_channel::<PushFrame>();
    let dispatcher = tokio::spawn({
        let handler = Arc::clone(&handler);

        async move {
            while let Some(frame) = queued_events.recv().await {
                handler.on_event(frame).await;
            }
        }
    });

    loop {
        tokio::select! {
            message = incoming.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<PushFrame>(text.as_str()) {
                        Ok(frame) => {
                            if events.send(frame).is_err() {
                                debug!("push event dispatcher has stopped");
                            }
                        }
                        Err(error) => warn!("ignored push frame: {error}"),
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_other)) => {}
                Some(Err(source)) => {
                    handler.on_error(&PushError::Transport(Box::new(source))).await;
                    break;
                }
            },
            command = outgoing.recv(), if publishers_alive => match command {
                Some(Outgoing::Frame(frame)) => {
                    if let Err(source) = sink.send(Message::text(frame)).await {
                        handler.on_error(&PushError::Transport(Box::new(source))).await;
                        break;
                    }
                }
                Some(Outgoing::Close) => {
                    if let Err(source) = sink.close().await {
                        debug!("push channel close failed: {source}");
                    }
                    break;
                }
                None => publishers_alive = false,
            },
        }
    }

    drop(events);

    if let Err(error) = dispatcher.await {
        warn!("push event dispatcher failed: {error}");
    }

    info!("push channel closed");

    handler.on_close().await;
}
