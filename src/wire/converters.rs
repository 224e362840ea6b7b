mod command;
mod error_handler;
mod job_option;
mod job_reference;
mod log_limit;
mod node_filter;
mod notification;
mod orchestrator;
mod plugin;
mod schedule;
mod script_interpreter;
mod step;

pub(crate) use self::{
    job_option::options_from_wire,
    notification::{notifications_from_wire, notifications_to_wire},
    schedule::{schedule_from_wire, schedule_to_wire},
};

use crate::{
    error::Error,
    wire::{ConversionContext, FieldPath},
};
use serde_json::{Map, Value};

/// Bidirectional converter of a nested config block.
pub(crate) trait WireBlock: Sized {
    /// Name of the block in the config tree.
    const BLOCK: &'static str;

    /// Converts the block to its wire representation. Returns `None` if the block is skipped.
    fn to_wire(
        &self,
        cx: &mut ConversionContext,
        path: &FieldPath,
    ) -> Result<Option<Map<String, Value>>, Error>;

    /// Converts the wire representation to the config block. Returns `None` if the element is
    /// skipped.
    fn from_wire(
        wire: &Map<String, Value>,
        cx: &mut ConversionContext,
        path: &FieldPath,
    ) -> Result<Option<Self>, Error>;
}

/// Returns the only block of a capped list, fails if there is more than one.
pub(crate) fn at_most_one<'b, T>(
    blocks: &'b [T],
    block: &str,
    parent: &FieldPath,
) -> Result<Option<&'b T>, Error> {
    match blocks {
        [] => Ok(None),
        [single] => Ok(Some(single)),
        _ => Err(Error::TooManyNestedBlocks {
            block: block.to_string(),
            parent: parent.to_string(),
            max: 1,
            found: blocks.len(),
        }),
    }
}

/// Casts wire value to an object.
pub(crate) fn object<'w>(
    value: &'w Value,
    path: &FieldPath,
) -> Result<&'w Map<String, Value>, Error> {
    value
        .as_object()
        .ok_or_else(|| Error::malformed(path, "expected an object."))
}

/// Returns the nested object with the specified key, `null` values are treated as absent.
pub(crate) fn optional_object<'w>(
    wire: &'w Map<String, Value>,
    key: &str,
    path: &FieldPath,
) -> Result<Option<&'w Map<String, Value>>, Error> {
    match wire.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => object(value, &path.child(key)).map(Some),
    }
}

/// Returns the nested value with the specified key, `null` values are treated as absent.
pub(crate) fn optional_value<'w>(wire: &'w Map<String, Value>, key: &str) -> Option<&'w Value> {
    wire.get(key).filter(|value| !value.is_null())
}
