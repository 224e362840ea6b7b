use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution state that triggers a notification.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    OnSuccess,
    OnFailure,
    OnStart,
    OnAvgDuration,
    OnRetryableFailure,
}

impl NotificationType {
    pub const ALL: [NotificationType; 5] = [
        Self::OnSuccess,
        Self::OnFailure,
        Self::OnStart,
        Self::OnAvgDuration,
        Self::OnRetryableFailure,
    ];

    /// Returns the name of the trigger as it's written in the job config.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnSuccess => "on_success",
            Self::OnFailure => "on_failure",
            Self::OnStart => "on_start",
            Self::OnAvgDuration => "on_avg_duration",
            Self::OnRetryableFailure => "on_retryable_failure",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
