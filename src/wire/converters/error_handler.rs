use crate::{
    error::Error,
    wire::{
        converters::{
            optional_value,
            step::{step_from_wire, step_to_wire},
            WireBlock,
        },
        field_mapper::{read_fields, write_fields, Accessor, FieldMapping, Presence},
        ConversionContext, FieldPath,
    },
};
use jobwire_types::jobs::ErrorHandler;
use serde_json::{Map, Value};

/// Wire key of the error handler within a command.
pub(super) const ERROR_HANDLER: &str = "errorhandler";

static ERROR_HANDLER_FIELDS: &[FieldMapping<ErrorHandler>] = &[FieldMapping::new(
    "keep_going_on_success",
    "keepgoingOnSuccess",
    Presence::NonEmpty,
    Accessor::Bool(|h| &h.keep_going_on_success, |h| &mut h.keep_going_on_success),
)];

impl WireBlock for ErrorHandler {
    const BLOCK: &'static str = "error_handler";

    fn to_wire(
        &self,
        cx: &mut ConversionContext,
        path: &FieldPath,
    ) -> Result<Option<Map<String, Value>>, Error> {
        let mut wire = step_to_wire(&self.step, cx, path)?;
        write_fields(
            ERROR_HANDLER_FIELDS,
            self,
            &mut wire,
            cx.config.plugin_config_encoding,
        );
        Ok(Some(wire))
    }

    fn from_wire(
        wire: &Map<String, Value>,
        cx: &mut ConversionContext,
        path: &FieldPath,
    ) -> Result<Option<Self>, Error> {
        if optional_value(wire, ERROR_HANDLER).is_some() {
            return Err(Error::malformed(
                path.child(ERROR_HANDLER),
                "error handlers can't have error handlers of their own.",
            ));
        }

        let mut error_handler = ErrorHandler {
            step: step_from_wire(wire, cx, path)?,
            ..Default::default()
        };
        read_fields(ERROR_HANDLER_FIELDS, wire, &mut error_handler, path)?;

        Ok(Some(error_handler))
    }
}
