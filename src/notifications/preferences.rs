use anyhow::Context;
use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{models::NotificationPreference, presence::PresenceRegistry, AppResult, AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PreferenceUpdate {
    notification_preference: NotificationPreference,
}

fn user_not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "User not found" }))).into_response()
}

#[debug_handler(state = AppState)]
pub(crate) async fn get_preferences(
    Path(user_id): Path<String>,
    State(presence): State<PresenceRegistry>,
) -> AppResult<Response> {
    let Some(user) = presence
        .find(&user_id)
        .await
        .context("Failed to fetch preferences")?
    else {
        return Ok(user_not_found());
    };

    Ok(Json(json!({
        "username": user.username,
        "notificationPreference": user.notification_preference,
    }))
    .into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_preferences(
    Path(user_id): Path<String>,
    State(presence): State<PresenceRegistry>,
    Json(PreferenceUpdate { notification_preference }): Json<PreferenceUpdate>,
) -> AppResult<Response> {
    let updated = presence
        .set_preference(&user_id, notification_preference)
        .await
        .context("Failed to update preferences")?;

    if !updated {
        return Ok(user_not_found());
    }

    tracing::info!(user_id = %user_id, %notification_preference, "notification preference changed");
    Ok(Json(json!({ "message": "Preferences updated" })).into_response())
}
