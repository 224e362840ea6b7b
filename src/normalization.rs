use itertools::Itertools;
use jobwire_types::jobs::{
    Command, EmailNotification, ErrorHandler, Job, JobOption, JobReference, JobReferenceDispatch,
    JobReferenceNodeFilter, LogLimit, NodeFilter, Notification, StepDefinition,
    WebhookNotification,
};

/// Equality that ignores differences the remote scheduler introduces on its own: reordered
/// notifications, and case or whitespace changes in tags. Used only for drift detection, never
/// to produce wire documents.
pub trait SemanticEq {
    fn semantic_eq(&self, other: &Self) -> bool;
}

/// Checks whether two values are equal after normalization.
pub fn semantic_equals<T: SemanticEq + ?Sized>(a: &T, b: &T) -> bool {
    a.semantic_eq(b)
}

/// Comma-separated tag string.
#[derive(Debug, Copy, Clone)]
pub struct TagString<'t>(pub &'t str);

impl SemanticEq for TagString<'_> {
    fn semantic_eq(&self, other: &Self) -> bool {
        normalize_tags(self.0) == normalize_tags(other.0)
    }
}

impl SemanticEq for [Notification] {
    fn semantic_eq(&self, other: &Self) -> bool {
        normalize_notifications(self) == normalize_notifications(other)
    }
}

impl SemanticEq for Vec<Notification> {
    fn semantic_eq(&self, other: &Self) -> bool {
        self.as_slice().semantic_eq(other.as_slice())
    }
}

impl SemanticEq for Job {
    fn semantic_eq(&self, other: &Self) -> bool {
        normalize_job(self) == normalize_job(other)
    }
}

/// Splits comma-separated tags, trims and lowercases them, drops empty and duplicate tags, and
/// joins them back in sorted order.
pub fn normalize_tags(tags: &str) -> String {
    tags.split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .sorted()
        .dedup()
        .join(",")
}

/// Sorts notifications by their trigger, notifications without a trigger go last.
pub fn normalize_notifications(notifications: &[Notification]) -> Vec<Notification> {
    notifications
        .iter()
        .cloned()
        .sorted_by_key(|notification| {
            (
                notification.notification_type.is_none(),
                notification
                    .notification_type
                    .map(|notification_type| notification_type.as_str()),
            )
        })
        .collect()
}

/// Returns the job with all order- and case-insensitive fields normalized. Empty optional strings
/// are never emitted to the wire document, so they are treated as unset.
pub fn normalize_job(job: &Job) -> Job {
    Job {
        group_name: non_empty(&job.group_name),
        project_name: non_empty(&job.project_name),
        uuid: non_empty(&job.uuid),
        log_level: non_empty(&job.log_level),
        timeout: non_empty(&job.timeout),
        retry: non_empty(&job.retry),
        time_zone: non_empty(&job.time_zone),
        tags: job
            .tags
            .as_deref()
            .map(normalize_tags)
            .filter(|tags| !tags.is_empty()),
        command_ordering_strategy: non_empty(&job.command_ordering_strategy),
        rank_attribute: non_empty(&job.rank_attribute),
        rank_order: non_empty(&job.rank_order),
        schedule: non_empty(&job.schedule),
        commands: job
            .commands
            .iter()
            .map(|command| Command {
                step: normalize_step(&command.step),
                error_handlers: command
                    .error_handlers
                    .iter()
                    .map(|error_handler| ErrorHandler {
                        step: normalize_step(&error_handler.step),
                        ..error_handler.clone()
                    })
                    .collect(),
            })
            .collect(),
        options: job.options.iter().map(normalize_option).collect(),
        node_filter: job.node_filter.as_ref().map(|node_filter| NodeFilter {
            filter_query: non_empty(&node_filter.filter_query),
            exclude_query: non_empty(&node_filter.exclude_query),
            ..node_filter.clone()
        }),
        notifications: normalize_notifications(
            &job.notifications
                .iter()
                .map(normalize_notification)
                .collect::<Vec<_>>(),
        ),
        log_limit: job.log_limit.as_ref().map(|log_limit| LogLimit {
            action: non_empty(&log_limit.action),
            status: non_empty(&log_limit.status),
            ..log_limit.clone()
        }),
        ..job.clone()
    }
}

fn normalize_step(step: &StepDefinition) -> StepDefinition {
    StepDefinition {
        description: non_empty(&step.description),
        shell_command: non_empty(&step.shell_command),
        inline_script: non_empty(&step.inline_script),
        script_url: non_empty(&step.script_url),
        script_file: non_empty(&step.script_file),
        script_file_args: non_empty(&step.script_file_args),
        file_extension: non_empty(&step.file_extension),
        job_references: step
            .job_references
            .iter()
            .map(|job_reference| JobReference {
                name: non_empty(&job_reference.name),
                group_name: non_empty(&job_reference.group_name),
                uuid: non_empty(&job_reference.uuid),
                project_name: non_empty(&job_reference.project_name),
                args: non_empty(&job_reference.args),
                node_filter: job_reference.node_filter.as_ref().map(|node_filter| {
                    JobReferenceNodeFilter {
                        filter: non_empty(&node_filter.filter),
                        dispatch: node_filter.dispatch.as_ref().map(|dispatch| {
                            JobReferenceDispatch {
                                rank_attribute: non_empty(&dispatch.rank_attribute),
                                rank_order: non_empty(&dispatch.rank_order),
                                ..dispatch.clone()
                            }
                        }),
                    }
                }),
                ..job_reference.clone()
            })
            .collect(),
        ..step.clone()
    }
}

fn normalize_option(option: &JobOption) -> JobOption {
    JobOption {
        label: non_empty(&option.label),
        description: non_empty(&option.description),
        default_value: non_empty(&option.default_value),
        value_choices_url: non_empty(&option.value_choices_url),
        validation_regex: non_empty(&option.validation_regex),
        multi_value_delimiter: non_empty(&option.multi_value_delimiter),
        storage_path: non_empty(&option.storage_path),
        date_format: non_empty(&option.date_format),
        option_type: non_empty(&option.option_type),
        ..option.clone()
    }
}

// Recipients and URLs travel as a single comma-joined string.
fn normalize_notification(notification: &Notification) -> Notification {
    Notification {
        email: notification
            .email
            .iter()
            .map(|email| EmailNotification {
                recipients: normalize_joined_list(&email.recipients),
                subject: non_empty(&email.subject),
                ..email.clone()
            })
            .collect(),
        webhook: notification
            .webhook
            .iter()
            .map(|webhook| WebhookNotification {
                urls: normalize_joined_list(&webhook.urls),
                format: non_empty(&webhook.format),
                http_method: non_empty(&webhook.http_method),
            })
            .collect(),
        ..notification.clone()
    }
}

fn normalize_joined_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|value| !value.is_empty())
}
