use crate::jobs::{Command, JobOption, LogLimit, NodeFilter, Notification, Orchestrator};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Desired state of a scheduled job.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, Hash, PartialEq, Eq)]
#[serde(default)]
pub struct Job {
    /// Name of the job, unique within the group.
    pub name: String,
    /// Slash-separated group path, e.g. `ops/maintenance`.
    pub group_name: Option<String>,
    /// Project the job belongs to.
    pub project_name: Option<String>,
    pub description: String,
    /// UUID of the job, assigned by the scheduler if not set.
    pub uuid: Option<String>,
    /// Whether the job can be executed. Defaults to `true`.
    pub execution_enabled: bool,
    /// Whether the job schedule is active. Defaults to `true`.
    pub schedule_enabled: bool,
    /// Allow more than one execution of the job to run at the same time.
    #[serde(skip_serializing_if = "crate::utils::is_false")]
    pub allow_concurrent_executions: bool,
    /// Log verbosity: `DEBUG`, `VERBOSE`, `INFO`, `WARN` or `ERROR`.
    pub log_level: Option<String>,
    /// Maximum execution duration, e.g. `1h30m`.
    pub timeout: Option<String>,
    /// Number of retries of a failed execution.
    pub retry: Option<String>,
    pub time_zone: Option<String>,
    /// Case-insensitive comma-separated tags.
    pub tags: Option<String>,
    /// Whether a user can change the node filter when running the job.
    #[serde(skip_serializing_if = "crate::utils::is_false")]
    pub node_filter_editable: bool,
    /// Whether the matched nodes are selected by default when running the job.
    pub nodes_selected_by_default: Option<bool>,
    /// Continue with the next command if a command fails.
    #[serde(skip_serializing_if = "crate::utils::is_false")]
    pub continue_on_error: bool,
    /// Workflow strategy, e.g. `node-first`, `step-first` or `parallel`.
    pub command_ordering_strategy: Option<String>,
    /// Number of nodes to dispatch the job to in parallel.
    pub max_thread_count: Option<u64>,
    /// Continue with the next node if the job fails on a node.
    #[serde(skip_serializing_if = "crate::utils::is_false")]
    pub continue_next_node_on_error: bool,
    /// Node attribute used to order the nodes.
    pub rank_attribute: Option<String>,
    /// Node order, `ascending` or `descending`.
    pub rank_order: Option<String>,
    /// Treat an empty set of matched nodes as success.
    #[serde(skip_serializing_if = "crate::utils::is_false")]
    pub success_on_empty_node_filter: bool,
    /// Workflow commands, in execution order.
    #[serde(rename = "command", skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
    #[serde(rename = "option", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<JobOption>,
    /// Quartz-like schedule with seven fields: seconds, minute, hour, day of month, month, day of
    /// week, and year.
    pub schedule: Option<String>,
    pub node_filter: Option<NodeFilter>,
    #[serde(rename = "notification", skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<Notification>,
    pub orchestrator: Option<Orchestrator>,
    pub log_limit: Option<LogLimit>,
}

impl Default for Job {
    fn default() -> Self {
        Self {
            name: String::new(),
            group_name: None,
            project_name: None,
            description: String::new(),
            uuid: None,
            execution_enabled: true,
            schedule_enabled: true,
            allow_concurrent_executions: false,
            log_level: None,
            timeout: None,
            retry: None,
            time_zone: None,
            tags: None,
            node_filter_editable: false,
            nodes_selected_by_default: None,
            continue_on_error: false,
            command_ordering_strategy: None,
            max_thread_count: None,
            continue_next_node_on_error: false,
            rank_attribute: None,
            rank_order: None,
            success_on_empty_node_filter: false,
            commands: vec![],
            options: vec![],
            schedule: None,
            node_filter: None,
            notifications: vec![],
            orchestrator: None,
            log_limit: None,
        }
    }
}
