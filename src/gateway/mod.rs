mod dispatch;
mod events;
mod sessions;
mod ws;

use axum::{routing::get, Router};

use crate::AppState;

pub use dispatch::Gateway;
pub use events::{ClientEvent, PresenceUpdate, SendMessage, ServerEvent};
pub use sessions::ConnectionId;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::gateway_ws))
}
