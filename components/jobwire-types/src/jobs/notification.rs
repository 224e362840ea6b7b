mod email_notification;
mod notification_type;
mod webhook_notification;

pub use self::{
    email_notification::EmailNotification, notification_type::NotificationType,
    webhook_notification::WebhookNotification,
};

use crate::jobs::Plugin;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Notification sent when the job execution reaches a certain state.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Default, Debug, Clone, Hash, PartialEq, Eq)]
pub struct Notification {
    /// State that triggers the notification, notifications without a type are ignored.
    #[serde(rename = "type")]
    pub notification_type: Option<NotificationType>,
    /// Email to send, at most one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub email: Vec<EmailNotification>,
    /// Webhook to call, at most one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub webhook: Vec<WebhookNotification>,
    /// Notification plugin to invoke, at most one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugin: Vec<Plugin>,
}

impl Notification {
    /// Creates notification that sends an email to the specified recipients.
    pub fn email<I, R>(notification_type: NotificationType, recipients: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            notification_type: Some(notification_type),
            email: vec![EmailNotification {
                recipients: recipients.into_iter().map(Into::into).collect(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }
}
