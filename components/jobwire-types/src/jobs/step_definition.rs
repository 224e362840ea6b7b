use crate::jobs::{JobReference, Plugin, ScriptInterpreter};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Fields shared by workflow commands and their error handlers. Exactly one of the shell command,
/// inline script, script URL, script file, job reference, or plugin is expected to be set.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Default, Debug, Clone, Hash, PartialEq, Eq)]
pub struct StepDefinition {
    pub description: Option<String>,
    /// Shell command line to execute on the nodes.
    pub shell_command: Option<String>,
    /// Body of the script to execute on the nodes.
    pub inline_script: Option<String>,
    /// URL of the script to download and execute.
    pub script_url: Option<String>,
    /// Path of the script file to execute.
    pub script_file: Option<String>,
    /// Arguments passed to the script.
    pub script_file_args: Option<String>,
    /// Extension used for the temporary script file copied to the nodes.
    pub file_extension: Option<String>,
    /// Whether to expand `@option.name@`-like tokens in the script file.
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub expand_token_in_script_file: bool,
    pub script_interpreter: Option<ScriptInterpreter>,
    /// Job to invoke as a step, at most one.
    #[serde(rename = "job", default, skip_serializing_if = "Vec::is_empty")]
    pub job_references: Vec<JobReference>,
    /// Workflow step plugin, at most one.
    #[serde(rename = "step_plugin", default, skip_serializing_if = "Vec::is_empty")]
    pub step_plugins: Vec<Plugin>,
    /// Node step plugin, at most one.
    #[serde(rename = "node_step_plugin", default, skip_serializing_if = "Vec::is_empty")]
    pub node_step_plugins: Vec<Plugin>,
}
