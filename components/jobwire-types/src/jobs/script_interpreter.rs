use serde::{Deserialize, Serialize};

/// Interpreter used to run an inline script or a script file.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Hash, PartialEq, Eq)]
pub struct ScriptInterpreter {
    /// Command line used to invoke the interpreter, e.g. `sudo -u deploy bash`.
    pub invocation_string: String,
    /// Whether the script path and its arguments are passed to the interpreter as a single quoted
    /// argument.
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub args_quoted: bool,
}
