use std::time::Duration;

use axum::{
    debug_handler,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tracing::{error, info, warn};

use crate::AppState;

use super::{events::ClientEvent, Gateway};

/// How long a single frame may sit in the socket before the peer is dropped.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[debug_handler(state = AppState)]
pub(crate) async fn gateway_ws(
    State(gateway): State<Gateway>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |stream| serve_connection(gateway, stream))
}

async fn serve_connection(gateway: Gateway, stream: WebSocket) {
    let (id, mut inbox) = gateway.connect().await;
    info!(connection = %id, "user connected");

    let (mut sender, mut receiver) = stream.split();

    let mut writer = tokio::spawn(async move {
        while let Some(event) = inbox.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(err) => {
                    warn!(error = %err, "dropping unserializable event");
                    continue;
                }
            };
            match tokio::time::timeout(SEND_TIMEOUT, sender.send(Message::Text(text.into()))).await {
                Ok(Ok(())) => {}
                Ok(Err(_)) => break,
                Err(_) => {
                    warn!(connection = %id, "peer stopped reading, closing");
                    break;
                }
            }
        }
    });

    loop {
        tokio::select! {
            frame = receiver.next() => {
                let parsed: Result<ClientEvent, serde_json::Error> = match frame {
                    Some(Ok(Message::Text(text))) => serde_json::from_str(text.as_str()),
                    Some(Ok(Message::Binary(data))) => serde_json::from_slice(&data),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => {
                        warn!(connection = %id, error = %err, "transport error");
                        break;
                    }
                };

                let event = match parsed {
                    Ok(event) => event,
                    Err(err) => {
                        warn!(connection = %id, error = %err, "ignoring malformed frame");
                        continue;
                    }
                };

                let name = event.name();
                if let Err(err) = gateway.dispatch(id, event).await {
                    error!(connection = %id, event = name, error = %err, "event handler failed");
                }
            }
            _ = &mut writer => break,
        }
    }

    if let Err(err) = gateway.disconnect(id).await {
        error!(connection = %id, error = %err, "disconnect handler failed");
    }
    writer.abort();
    info!(connection = %id, "user disconnected");
}
