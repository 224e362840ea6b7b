use crate::{
    error::Error,
    wire::{
        converters::{optional_value, WireBlock},
        field_mapper::{read_fields, write_fields, Accessor, FieldMapping, Presence},
        ConversionContext, FieldPath,
    },
};
use jobwire_types::jobs::LogLimit;
use serde_json::{Map, Value};

// Log limit fields live at the top level of the wire job.
static LOG_LIMIT_FIELDS: &[FieldMapping<LogLimit>] = &[
    FieldMapping::new(
        "output",
        "loglimit",
        Presence::Always,
        Accessor::Str(|l| &l.output, |l| &mut l.output),
    ),
    FieldMapping::new(
        "action",
        "loglimitAction",
        Presence::NonEmpty,
        Accessor::OptStr(|l| &l.action, |l| &mut l.action),
    ),
    FieldMapping::new(
        "status",
        "loglimitStatus",
        Presence::NonEmpty,
        Accessor::OptStr(|l| &l.status, |l| &mut l.status),
    ),
];

impl WireBlock for LogLimit {
    const BLOCK: &'static str = "log_limit";

    fn to_wire(
        &self,
        cx: &mut ConversionContext,
        path: &FieldPath,
    ) -> Result<Option<Map<String, Value>>, Error> {
        if self.output.trim().is_empty() {
            cx.skip(path, "log limit output is missing.")?;
            return Ok(None);
        }

        let mut wire = Map::new();
        write_fields(
            LOG_LIMIT_FIELDS,
            self,
            &mut wire,
            cx.config.plugin_config_encoding,
        );
        Ok(Some(wire))
    }

    /// Reads the log limit from the wire job. Returns `None` without a diagnostic if the job
    /// doesn't have any of the log limit fields.
    fn from_wire(
        wire: &Map<String, Value>,
        cx: &mut ConversionContext,
        path: &FieldPath,
    ) -> Result<Option<Self>, Error> {
        if LOG_LIMIT_FIELDS
            .iter()
            .all(|field| optional_value(wire, field.wire_name).is_none())
        {
            return Ok(None);
        }

        let mut log_limit = LogLimit::default();
        read_fields(LOG_LIMIT_FIELDS, wire, &mut log_limit, path)?;
        if log_limit.output.trim().is_empty() {
            cx.skip(&path.child("loglimit"), "log limit output is missing.")?;
            return Ok(None);
        }

        Ok(Some(log_limit))
    }
}
