use crate::jobs::{ErrorHandler, StepDefinition};
use serde::{Deserialize, Serialize};

/// A single step of the job workflow.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Hash, PartialEq, Eq)]
pub struct Command {
    #[serde(flatten)]
    pub step: StepDefinition,
    /// Step to run when this command fails, at most one.
    #[serde(rename = "error_handler", default, skip_serializing_if = "Vec::is_empty")]
    pub error_handlers: Vec<ErrorHandler>,
}

impl Command {
    /// Creates a command that runs the specified shell command line.
    pub fn shell<C: Into<String>>(command: C) -> Self {
        Self {
            step: StepDefinition {
                shell_command: Some(command.into()),
                ..Default::default()
            },
            error_handlers: vec![],
        }
    }

    /// Creates a command that runs the specified inline script.
    pub fn script<S: Into<String>>(script: S) -> Self {
        Self {
            step: StepDefinition {
                inline_script: Some(script.into()),
                ..Default::default()
            },
            error_handlers: vec![],
        }
    }
}
