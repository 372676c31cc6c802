mod history;
mod repo;

use axum::{routing::get, Router};

use crate::AppState;

pub use repo::MessageRepository;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{sender}/{recipient}", get(history::history))
}
