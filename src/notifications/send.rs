use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::AppState;

use super::NotificationService;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PushRequest {
    user_id: String,
    message: String,
}

#[derive(Deserialize)]
pub(crate) struct EmailRequest {
    email: String,
    subject: String,
    body: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SmsRequest {
    phone_number: String,
    message: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn push(
    State(notifier): State<NotificationService>,
    Json(PushRequest { user_id, message }): Json<PushRequest>,
) -> Json<Value> {
    notifier.push(&user_id, &message).await;
    Json(json!({ "message": "Push notification sent" }))
}

#[debug_handler(state = AppState)]
pub(crate) async fn email(
    State(notifier): State<NotificationService>,
    Json(EmailRequest { email, subject, body }): Json<EmailRequest>,
) -> Json<Value> {
    notifier.email(&email, &subject, &body).await;
    Json(json!({ "message": "Email notification sent" }))
}

#[debug_handler(state = AppState)]
pub(crate) async fn sms(
    State(notifier): State<NotificationService>,
    Json(SmsRequest { phone_number, message }): Json<SmsRequest>,
) -> Json<Value> {
    notifier.sms(&phone_number, &message).await;
    Json(json!({ "message": "SMS notification sent (mock)" }))
}
