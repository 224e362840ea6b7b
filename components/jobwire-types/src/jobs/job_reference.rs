use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Reference to another job that is invoked as a workflow step. The referenced job is identified
/// either by its name (and optionally group and project) or by its UUID.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Default, Debug, Clone, Hash, PartialEq, Eq)]
pub struct JobReference {
    /// Name of the referenced job.
    pub name: Option<String>,
    /// Group path of the referenced job.
    pub group_name: Option<String>,
    /// UUID of the referenced job.
    pub uuid: Option<String>,
    /// Project of the referenced job, defaults to the project of the referencing job.
    pub project_name: Option<String>,
    /// Arguments passed to the referenced job.
    pub args: Option<String>,
    /// Run the referenced job once per matched node.
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub run_for_each_node: bool,
    /// Use the nodes of the referencing job when the referenced job runs.
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub child_nodes: bool,
    /// Fail the step if the referenced job has execution disabled.
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub fail_on_disable: bool,
    /// Don't send notifications of the referenced job.
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub ignore_notifications: bool,
    /// Pass the options of the referencing job down to the referenced job.
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub import_options: bool,
    /// Node filter that overrides the filter of the referenced job.
    pub node_filter: Option<JobReferenceNodeFilter>,
}

/// Node filter override of a job reference.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Default, Debug, Clone, Hash, PartialEq, Eq)]
pub struct JobReferenceNodeFilter {
    pub filter: Option<String>,
    pub dispatch: Option<JobReferenceDispatch>,
}

/// Node dispatch settings of a job reference node filter.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Default, Debug, Clone, Hash, PartialEq, Eq)]
pub struct JobReferenceDispatch {
    pub thread_count: Option<u64>,
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub keep_going: bool,
    pub rank_attribute: Option<String>,
    pub rank_order: Option<String>,
}

impl JobReference {
    /// Creates a reference to a job with the specified name.
    pub fn named<N: Into<String>>(name: N) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}
