use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Webhook notification.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Default, Debug, Clone, Hash, PartialEq, Eq)]
pub struct WebhookNotification {
    /// URLs to send the execution details to.
    #[serde(default)]
    pub urls: Vec<String>,
    /// Payload format, `xml` or `json`.
    pub format: Option<String>,
    /// HTTP method, `get` or `post`.
    pub http_method: Option<String>,
}
