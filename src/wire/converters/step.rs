use crate::{
    error::Error,
    wire::{
        converters::{
            at_most_one, optional_object, optional_value,
            script_interpreter::{script_interpreter_from_wire, script_interpreter_to_wire},
            WireBlock,
        },
        field_mapper::{read_bool, read_fields, write_fields, Accessor, FieldMapping, Presence},
        ConversionContext, FieldPath,
    },
};
use jobwire_types::jobs::{JobReference, Plugin, StepDefinition};
use serde_json::{Map, Value};
use tracing::debug;

const JOB_REFERENCE: &str = "jobref";
const NODE_STEP: &str = "nodeStep";
const STEP_PLUGIN: &str = "step_plugin";
const NODE_STEP_PLUGIN: &str = "node_step_plugin";

static STEP_FIELDS: &[FieldMapping<StepDefinition>] = &[
    FieldMapping::new(
        "description",
        "description",
        Presence::NonEmpty,
        Accessor::OptStr(|s| &s.description, |s| &mut s.description),
    ),
    FieldMapping::new(
        "shell_command",
        "exec",
        Presence::NonEmpty,
        Accessor::OptStr(|s| &s.shell_command, |s| &mut s.shell_command),
    ),
    FieldMapping::new(
        "inline_script",
        "script",
        Presence::NonEmpty,
        Accessor::OptStr(|s| &s.inline_script, |s| &mut s.inline_script),
    ),
    FieldMapping::new(
        "script_url",
        "scripturl",
        Presence::NonEmpty,
        Accessor::OptStr(|s| &s.script_url, |s| &mut s.script_url),
    ),
    FieldMapping::new(
        "script_file",
        "scriptfile",
        Presence::NonEmpty,
        Accessor::OptStr(|s| &s.script_file, |s| &mut s.script_file),
    ),
    FieldMapping::aliased(
        "script_file_args",
        "args",
        &["scriptargs"],
        Presence::NonEmpty,
        Accessor::OptStr(|s| &s.script_file_args, |s| &mut s.script_file_args),
    ),
    FieldMapping::new(
        "file_extension",
        "fileExtension",
        Presence::NonEmpty,
        Accessor::OptStr(|s| &s.file_extension, |s| &mut s.file_extension),
    ),
    FieldMapping::new(
        "expand_token_in_script_file",
        "expandTokenInScriptFile",
        Presence::NonEmpty,
        Accessor::Bool(
            |s| &s.expand_token_in_script_file,
            |s| &mut s.expand_token_in_script_file,
        ),
    ),
];

/// Converts fields shared by commands and error handlers to the wire step.
pub(super) fn step_to_wire(
    step: &StepDefinition,
    cx: &mut ConversionContext,
    path: &FieldPath,
) -> Result<Map<String, Value>, Error> {
    let mut wire = Map::new();
    write_fields(
        STEP_FIELDS,
        step,
        &mut wire,
        cx.config.plugin_config_encoding,
    );

    if let Some(interpreter) = &step.script_interpreter {
        script_interpreter_to_wire(interpreter, &mut wire, cx, path)?;
    }

    if let Some(job_reference) = at_most_one(&step.job_references, JobReference::BLOCK, path)? {
        if let Some(job_reference) =
            job_reference.to_wire(cx, &path.child(JobReference::BLOCK))?
        {
            wire.insert(JOB_REFERENCE.to_string(), Value::Object(job_reference));
        }
    }

    // Both plugin kinds are flattened into the step and share the same wire keys.
    let plugin = match (
        at_most_one(&step.step_plugins, STEP_PLUGIN, path)?,
        at_most_one(&step.node_step_plugins, NODE_STEP_PLUGIN, path)?,
    ) {
        (Some(_), Some(_)) => {
            return Err(Error::invariant(
                path,
                format!("step can't have both `{STEP_PLUGIN}` and `{NODE_STEP_PLUGIN}` blocks."),
            ))
        }
        (Some(plugin), None) => Some((plugin, false, path.child(STEP_PLUGIN))),
        (None, Some(plugin)) => Some((plugin, true, path.child(NODE_STEP_PLUGIN))),
        (None, None) => None,
    };

    if let Some((plugin, node_step, plugin_path)) = plugin {
        if let Some(plugin) = plugin.to_wire(cx, &plugin_path)? {
            wire.extend(plugin);
            wire.insert(NODE_STEP.to_string(), Value::Bool(node_step));
        }
    }

    Ok(wire)
}

/// Reads fields shared by commands and error handlers from the wire step.
pub(super) fn step_from_wire(
    wire: &Map<String, Value>,
    cx: &mut ConversionContext,
    path: &FieldPath,
) -> Result<StepDefinition, Error> {
    let mut step = StepDefinition::default();
    read_fields(STEP_FIELDS, wire, &mut step, path)?;

    step.script_interpreter = script_interpreter_from_wire(wire, cx, path)?;

    if let Some(job_reference) = optional_object(wire, JOB_REFERENCE, path)? {
        step.job_references.extend(JobReference::from_wire(
            job_reference,
            cx,
            &path.child(JOB_REFERENCE),
        )?);
    }

    if optional_value(wire, "type").is_some() {
        let node_step = optional_value(wire, NODE_STEP)
            .map(|value| read_bool(value, &path.child(NODE_STEP)))
            .transpose()?
            .unwrap_or_default();
        if let Some(plugin) = Plugin::from_wire(wire, cx, path)? {
            debug!(path = %path, plugin = %plugin.plugin_type, node_step, "Read step plugin.");
            if node_step {
                step.node_step_plugins.push(plugin);
            } else {
                step.step_plugins.push(plugin);
            }
        }
    }

    Ok(step)
}
