use crate::jobs::StepDefinition;
use serde::{Deserialize, Serialize};

/// Step executed when a workflow command fails. Error handlers can't have error handlers of their
/// own.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Hash, PartialEq, Eq)]
pub struct ErrorHandler {
    #[serde(flatten)]
    pub step: StepDefinition,
    /// Continue the workflow as if the command succeeded when the handler succeeds.
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub keep_going_on_success: bool,
}
