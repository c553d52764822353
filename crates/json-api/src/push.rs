//! Push channel sessions.
//!
//! Each WebSocket connection on `/ws` becomes one relay session. Text
//! frames carrying `product-update` are republished to every session as
//! `product-updated`.

use std::sync::Arc;

use futures_util::{SinkExt as _, StreamExt as _};
use salvo::{
    prelude::*,
    websocket::{Message, WebSocket, WebSocketUpgrade},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use catalog_app::relay::{PRODUCT_UPDATE_EVENT, PRODUCT_UPDATED_EVENT, RelaySession};

use crate::{extensions::*, state::State};

#[derive(Debug, Deserialize)]
struct IncomingFrame {
    event: String,

    #[serde(default)]
    data: Value,
}

#[derive(Debug, Serialize)]
struct OutgoingFrame<'a> {
    event: &'a str,
    data: &'a Value,
}

#[derive(Debug, Error)]
pub(crate) enum FrameError {
    #[error("frame is not a JSON event: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unexpected event {0:?}")]
    UnexpectedEvent(String),
}

/// Extract the payload of a client `product-update` frame.
pub(crate) fn parse_frame(bytes: &[u8]) -> Result<Value, FrameError> {
    let frame: IncomingFrame = serde_json::from_slice(bytes)?;

    if frame.event != PRODUCT_UPDATE_EVENT {
        return Err(FrameError::UnexpectedEvent(frame.event));
    }

    Ok(frame.data)
}

/// Wrap a relayed payload as a `product-updated` frame.
pub(crate) fn encode_frame(data: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(&OutgoingFrame {
        event: PRODUCT_UPDATED_EVENT,
        data,
    })
}

fn origin_allowed(origin: Option<&str>, allowed_origin: &str) -> bool {
    origin.is_none_or(|origin| origin == allowed_origin)
}

/// Push channel upgrade handler
#[handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let origin = req.header::<String>("origin");

    if !origin_allowed(origin.as_deref(), &state.allowed_origin) {
        warn!(origin = ?origin, "refused push session from foreign origin");

        return Err(StatusError::forbidden().brief("Origin not allowed"));
    }

    let relay = state.app.relay.clone();

    WebSocketUpgrade::new()
        .upgrade(req, res, move |ws| run_session(ws, relay.connect()))
        .await
}

async fn run_session(ws: WebSocket, mut session: RelaySession) {
    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            incoming = stream.next() => match incoming {
                Some(Ok(message)) if message.is_close() => break,
                Some(Ok(message)) if message.is_text() => {
                    match parse_frame(message.as_bytes()) {
                        Ok(payload) => {
                            let delivered = session.publish(payload);

                            debug!(session_id = %session.id(), delivered, "relayed product update");
                        }
                        Err(error) => {
                            warn!(session_id = %session.id(), "ignored push frame: {error}");
                        }
                    }
                }
                Some(Ok(_control)) => {}
                Some(Err(error)) => {
                    warn!(session_id = %session.id(), "push session transport error: {error}");
                    break;
                }
                None => break,
            },
            event = session.recv() => {
                let Some(event) = event else {
                    break;
                };

                let frame = match encode_frame(&event.payload) {
                    Ok(frame) => frame,
                    Err(error) => {
                        warn!(session_id = %session.id(), "could not encode relay event: {error}");
                        continue;
                    }
                };

                if let Err(error) = sink.send(Message::text(frame)).await {
                    warn!(session_id = %session.id(), "failed to deliver relay event: {error}");
                    break;
                }
            }
        }
    }
}
