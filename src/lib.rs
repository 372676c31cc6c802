pub mod config;
pub mod db;
pub mod gateway;
pub mod messages;
pub mod models;
pub mod notifications;
pub mod presence;

use axum::{
    debug_handler,
    extract::FromRef,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::ChatConfig;
use gateway::Gateway;
use messages::MessageRepository;
use notifications::NotificationService;
use presence::PresenceRegistry;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub messages: MessageRepository,
    pub presence: PresenceRegistry,
    pub gateway: Gateway,
    pub notifier: NotificationService,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: &ChatConfig) -> Self {
        let messages = MessageRepository::new(db_pool.clone());
        let presence = PresenceRegistry::new(db_pool);
        let gateway = Gateway::new(messages.clone(), presence.clone())
            .offline_on_disconnect(config.offline_on_disconnect);

        Self {
            messages,
            presence,
            gateway,
            notifier: NotificationService,
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .merge(gateway::router())
        .nest("/api/messages", messages::router())
        .nest("/api/notifications", notifications::router())
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[debug_handler]
async fn index() -> &'static str {
    "chatpulse server is running"
}

pub type AppResult<T> = Result<T, AppError>;

/// Any failure on an HTTP path. Renders as a 500 whose body carries the
/// outermost context message; the full chain only goes to the log.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
