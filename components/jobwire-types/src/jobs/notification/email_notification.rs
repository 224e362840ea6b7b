use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Email notification.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Default, Debug, Clone, Hash, PartialEq, Eq)]
pub struct EmailNotification {
    /// Email addresses to send the notification to.
    #[serde(default)]
    pub recipients: Vec<String>,
    pub subject: Option<String>,
    /// Attach the execution log to the email.
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub attach_log: bool,
    /// Include the execution log in the email body instead of attaching it as a file.
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub attach_log_inline: bool,
}
