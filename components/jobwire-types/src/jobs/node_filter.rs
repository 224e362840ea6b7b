use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Selects the nodes the job runs on.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Default, Debug, Clone, Hash, PartialEq, Eq)]
pub struct NodeFilter {
    /// Node filter query, e.g. `tags: web !name: web3`.
    pub filter_query: Option<String>,
    /// Filter that excludes nodes matched by `filter_query`.
    pub exclude_query: Option<String>,
    /// Whether the exclude filter takes precedence over the include filter.
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub exclude_precedence: bool,
}
