mod preferences;
mod send;
mod service;

use axum::{routing::{get, post}, Router};

use crate::AppState;

pub use service::NotificationService;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/push", post(send::push))
        .route("/email", post(send::email))
        .route("/sms", post(send::sms))
        .route(
            "/preferences/{user_id}",
            get(preferences::get_preferences).put(preferences::update_preferences),
        )
}
