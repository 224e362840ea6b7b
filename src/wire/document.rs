use crate::{
    config::ConverterConfig,
    error::Error,
    wire::{
        converters::{
            notifications_from_wire, notifications_to_wire, object, optional_object,
            optional_value, options_from_wire, schedule_from_wire, schedule_to_wire, WireBlock,
        },
        field_mapper::{read_fields, write_fields, Accessor, FieldMapping, Presence},
        Conversion, ConversionContext, Direction, FieldPath, WireDocument,
    },
};
use jobwire_types::jobs::{Command, Job, JobOption, LogLimit, NodeFilter, Orchestrator};
use serde_json::{Map, Value};
use tracing::debug;

const SEQUENCE: &str = "sequence";
const COMMANDS: &str = "commands";
const DISPATCH: &str = "dispatch";
const OPTIONS: &str = "options";
const SCHEDULE: &str = "schedule";
const NODE_FILTER: &str = "nodefilters";
const NOTIFICATION: &str = "notification";
const ORCHESTRATOR: &str = "orchestrator";

static JOB_FIELDS: &[FieldMapping<Job>] = &[
    FieldMapping::new(
        "name",
        "name",
        Presence::Always,
        Accessor::Str(|j| &j.name, |j| &mut j.name),
    ),
    FieldMapping::new(
        "group_name",
        "group",
        Presence::NonEmpty,
        Accessor::OptStr(|j| &j.group_name, |j| &mut j.group_name),
    ),
    FieldMapping::new(
        "project_name",
        "project",
        Presence::NonEmpty,
        Accessor::OptStr(|j| &j.project_name, |j| &mut j.project_name),
    ),
    FieldMapping::new(
        "description",
        "description",
        Presence::Always,
        Accessor::Str(|j| &j.description, |j| &mut j.description),
    ),
    FieldMapping::aliased(
        "uuid",
        "uuid",
        &["id"],
        Presence::NonEmpty,
        Accessor::OptStr(|j| &j.uuid, |j| &mut j.uuid),
    ),
    FieldMapping::new(
        "execution_enabled",
        "executionEnabled",
        Presence::Always,
        Accessor::Bool(|j| &j.execution_enabled, |j| &mut j.execution_enabled),
    ),
    FieldMapping::new(
        "schedule_enabled",
        "scheduleEnabled",
        Presence::Always,
        Accessor::Bool(|j| &j.schedule_enabled, |j| &mut j.schedule_enabled),
    ),
    FieldMapping::new(
        "allow_concurrent_executions",
        "multipleExecutions",
        Presence::NonEmpty,
        Accessor::Bool(
            |j| &j.allow_concurrent_executions,
            |j| &mut j.allow_concurrent_executions,
        ),
    ),
    FieldMapping::new(
        "log_level",
        "loglevel",
        Presence::NonEmpty,
        Accessor::OptStr(|j| &j.log_level, |j| &mut j.log_level),
    ),
    FieldMapping::new(
        "timeout",
        "timeout",
        Presence::NonEmpty,
        Accessor::OptStr(|j| &j.timeout, |j| &mut j.timeout),
    ),
    FieldMapping::new(
        "retry",
        "retry",
        Presence::NonEmpty,
        Accessor::OptStr(|j| &j.retry, |j| &mut j.retry),
    ),
    FieldMapping::new(
        "time_zone",
        "timeZone",
        Presence::NonEmpty,
        Accessor::OptStr(|j| &j.time_zone, |j| &mut j.time_zone),
    ),
    FieldMapping::new(
        "tags",
        "tags",
        Presence::NonEmpty,
        Accessor::OptStr(|j| &j.tags, |j| &mut j.tags),
    ),
    FieldMapping::new(
        "node_filter_editable",
        "nodeFilterEditable",
        Presence::NonEmpty,
        Accessor::Bool(|j| &j.node_filter_editable, |j| &mut j.node_filter_editable),
    ),
    FieldMapping::new(
        "nodes_selected_by_default",
        "nodesSelectedByDefault",
        Presence::NonNull,
        Accessor::OptBool(
            |j| &j.nodes_selected_by_default,
            |j| &mut j.nodes_selected_by_default,
        ),
    ),
];

static SEQUENCE_FIELDS: &[FieldMapping<Job>] = &[
    FieldMapping::new(
        "continue_on_error",
        "keepgoing",
        Presence::Always,
        Accessor::Bool(|j| &j.continue_on_error, |j| &mut j.continue_on_error),
    ),
    FieldMapping::new(
        "command_ordering_strategy",
        "strategy",
        Presence::NonEmpty,
        Accessor::OptStr(
            |j| &j.command_ordering_strategy,
            |j| &mut j.command_ordering_strategy,
        ),
    ),
];

static DISPATCH_FIELDS: &[FieldMapping<Job>] = &[
    FieldMapping::new(
        "max_thread_count",
        "threadcount",
        Presence::NonNull,
        Accessor::Int(|j| &j.max_thread_count, |j| &mut j.max_thread_count),
    ),
    FieldMapping::new(
        "continue_next_node_on_error",
        "keepgoing",
        Presence::NonEmpty,
        Accessor::Bool(
            |j| &j.continue_next_node_on_error,
            |j| &mut j.continue_next_node_on_error,
        ),
    ),
    FieldMapping::new(
        "rank_attribute",
        "rankAttribute",
        Presence::NonEmpty,
        Accessor::OptStr(|j| &j.rank_attribute, |j| &mut j.rank_attribute),
    ),
    FieldMapping::new(
        "rank_order",
        "rankOrder",
        Presence::NonEmpty,
        Accessor::OptStr(|j| &j.rank_order, |j| &mut j.rank_order),
    ),
    FieldMapping::new(
        "success_on_empty_node_filter",
        "successOnEmptyNodeFilter",
        Presence::NonEmpty,
        Accessor::Bool(
            |j| &j.success_on_empty_node_filter,
            |j| &mut j.success_on_empty_node_filter,
        ),
    ),
];

/// Converts jobs to wire documents and back.
pub struct DocumentAssembler<'c> {
    config: &'c ConverterConfig,
}

impl<'c> DocumentAssembler<'c> {
    /// Creates a new assembler with the specified converter config.
    pub fn new(config: &'c ConverterConfig) -> Self {
        Self { config }
    }

    /// Converts the job to the wire document.
    pub fn assemble(&self, job: &Job) -> Result<Conversion<WireDocument>, Error> {
        let mut cx = ConversionContext::new(self.config, Direction::ToWire);
        let path = FieldPath::root("job");
        if job.name.trim().is_empty() {
            return Err(Error::invariant(path.child("name"), "job name can't be empty."));
        }

        let encoding = self.config.plugin_config_encoding;
        let mut wire = Map::new();
        write_fields(JOB_FIELDS, job, &mut wire, encoding);

        let mut sequence = Map::new();
        write_fields(SEQUENCE_FIELDS, job, &mut sequence, encoding);
        let mut commands = Vec::with_capacity(job.commands.len());
        for (index, command) in job.commands.iter().enumerate() {
            let path = path.child(Command::BLOCK).index(index);
            commands.extend(command.to_wire(&mut cx, &path)?.map(Value::Object));
        }
        sequence.insert(COMMANDS.to_string(), Value::Array(commands));
        wire.insert(SEQUENCE.to_string(), Value::Object(sequence));

        let mut dispatch = Map::new();
        write_fields(DISPATCH_FIELDS, job, &mut dispatch, encoding);
        if !dispatch.is_empty() {
            wire.insert(DISPATCH.to_string(), Value::Object(dispatch));
        }

        let mut options = Vec::with_capacity(job.options.len());
        for (index, option) in job.options.iter().enumerate() {
            let path = path.child(JobOption::BLOCK).index(index);
            options.extend(option.to_wire(&mut cx, &path)?.map(Value::Object));
        }
        if !options.is_empty() {
            wire.insert(OPTIONS.to_string(), Value::Array(options));
        }

        if let Some(schedule) = &job.schedule {
            wire.insert(
                SCHEDULE.to_string(),
                schedule_to_wire(schedule, &path.child(SCHEDULE))?,
            );
        }

        if let Some(node_filter) = &job.node_filter {
            if let Some(node_filter) =
                node_filter.to_wire(&mut cx, &path.child(NodeFilter::BLOCK))?
            {
                wire.insert(NODE_FILTER.to_string(), Value::Object(node_filter));
            }
        }

        if let Some(notifications) =
            notifications_to_wire(&job.notifications, &mut cx, &path.child(NOTIFICATION))?
        {
            wire.insert(NOTIFICATION.to_string(), Value::Object(notifications));
        }

        if let Some(orchestrator) = &job.orchestrator {
            if let Some(orchestrator) =
                orchestrator.to_wire(&mut cx, &path.child(Orchestrator::BLOCK))?
            {
                wire.insert(ORCHESTRATOR.to_string(), Value::Object(orchestrator));
            }
        }

        if let Some(log_limit) = &job.log_limit {
            if let Some(log_limit) = log_limit.to_wire(&mut cx, &path.child(LogLimit::BLOCK))? {
                wire.extend(log_limit);
            }
        }

        debug!(
            job = %job.name,
            commands = job.commands.len(),
            options = job.options.len(),
            "Assembled job wire document."
        );

        Ok(cx.finish(Value::Object(wire)))
    }

    /// Converts the wire document to the job. Documents that hold a list with a single job are
    /// accepted as well.
    pub fn disassemble(&self, document: &WireDocument) -> Result<Conversion<Job>, Error> {
        let mut cx = ConversionContext::new(self.config, Direction::FromWire);
        let path = FieldPath::root("job");

        let wire = match document {
            Value::Array(jobs) if jobs.len() == 1 => object(&jobs[0], &path.index(0))?,
            Value::Array(jobs) => {
                return Err(Error::malformed(
                    &path,
                    format!("expected a single job, found {}.", jobs.len()),
                ))
            }
            document => object(document, &path)?,
        };

        let mut job = Job::default();
        read_fields(JOB_FIELDS, wire, &mut job, &path)?;
        if job.name.trim().is_empty() {
            return Err(Error::malformed(path.child("name"), "job name is missing."));
        }

        if let Some(sequence) = optional_object(wire, SEQUENCE, &path)? {
            let path = path.child(SEQUENCE);
            read_fields(SEQUENCE_FIELDS, sequence, &mut job, &path)?;

            let path = path.child(COMMANDS);
            match optional_value(sequence, COMMANDS) {
                None => {}
                Some(Value::Array(commands)) => {
                    for (index, command) in commands.iter().enumerate() {
                        let path = path.index(index);
                        job.commands.extend(Command::from_wire(
                            object(command, &path)?,
                            &mut cx,
                            &path,
                        )?);
                    }
                }
                Some(_) => return Err(Error::malformed(&path, "expected an array.")),
            }
        }

        if let Some(dispatch) = optional_object(wire, DISPATCH, &path)? {
            read_fields(DISPATCH_FIELDS, dispatch, &mut job, &path.child(DISPATCH))?;
        }

        if let Some(options) = optional_value(wire, OPTIONS) {
            job.options = options_from_wire(options, &mut cx, &path.child(OPTIONS))?;
        }

        if let Some(schedule) = optional_value(wire, SCHEDULE) {
            job.schedule = Some(schedule_from_wire(schedule, &path.child(SCHEDULE))?);
        }

        if let Some(node_filter) = optional_object(wire, NODE_FILTER, &path)? {
            job.node_filter =
                NodeFilter::from_wire(node_filter, &mut cx, &path.child(NODE_FILTER))?;
        }

        if let Some(notifications) = optional_value(wire, NOTIFICATION) {
            job.notifications =
                notifications_from_wire(notifications, &mut cx, &path.child(NOTIFICATION))?;
        }

        if let Some(orchestrator) = optional_object(wire, ORCHESTRATOR, &path)? {
            job.orchestrator =
                Orchestrator::from_wire(orchestrator, &mut cx, &path.child(ORCHESTRATOR))?;
        }

        job.log_limit = LogLimit::from_wire(wire, &mut cx, &path)?;

        debug!(
            job = %job.name,
            commands = job.commands.len(),
            options = job.options.len(),
            "Disassembled job wire document."
        );

        Ok(cx.finish(job))
    }
}
