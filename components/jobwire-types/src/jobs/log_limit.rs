use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Limit on the amount of log output an execution may produce.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Default, Debug, Clone, Hash, PartialEq, Eq)]
pub struct LogLimit {
    /// Limit value: a number of lines (`100`), lines per node (`100/node`), or a size (`10MB`).
    #[serde(default)]
    pub output: String,
    /// What happens once the limit is reached: `halt` or `truncate`.
    pub action: Option<String>,
    /// Execution status used when the execution is halted, e.g. `failed`.
    pub status: Option<String>,
}
