mod command;
mod error_handler;
mod job;
mod job_option;
mod job_reference;
mod log_limit;
mod node_filter;
mod notification;
mod orchestrator;
mod plugin;
mod script_interpreter;
mod step_definition;

pub use self::{
    command::Command,
    error_handler::ErrorHandler,
    job::Job,
    job_option::JobOption,
    job_reference::{JobReference, JobReferenceDispatch, JobReferenceNodeFilter},
    log_limit::LogLimit,
    node_filter::NodeFilter,
    notification::{
        EmailNotification, Notification, NotificationType, WebhookNotification,
    },
    orchestrator::{Orchestrator, OrchestratorSort},
    plugin::Plugin,
    script_interpreter::ScriptInterpreter,
    step_definition::StepDefinition,
};
