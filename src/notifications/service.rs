use tracing::debug;

/// Outbound notification channels. None of them deliver anything yet;
/// each call is logged and dropped.
#[derive(Clone, Default)]
pub struct NotificationService;

impl NotificationService {
    pub async fn push(&self, user_id: &str, message: &str) {
        debug!(user_id, message, "push notification requested");
    }

    pub async fn email(&self, address: &str, subject: &str, body: &str) {
        debug!(address, subject, body_len = body.len(), "email notification requested");
    }

    pub async fn sms(&self, phone_number: &str, message: &str) {
        debug!(phone_number, message, "sms notification requested (mock)");
    }
}
