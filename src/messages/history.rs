use anyhow::Context;
use axum::{debug_handler, extract::{Path, State}, Json};

use crate::{models::MessageRecord, AppResult, AppState};

use super::MessageRepository;

#[debug_handler(state = AppState)]
pub(crate) async fn history(
    Path((sender, recipient)): Path<(String, String)>,
    State(messages): State<MessageRepository>,
) -> AppResult<Json<Vec<MessageRecord>>> {
    let conversation = messages
        .find_conversation(&sender, &recipient)
        .await
        .context("Failed to fetch messages")?;

    Ok(Json(conversation))
}
