use crate::{
    config::ScriptInterpreterShape,
    error::Error,
    wire::{
        converters::optional_value,
        field_mapper::{read_bool, read_string},
        ConversionContext, FieldPath,
    },
};
use jobwire_types::jobs::ScriptInterpreter;
use serde_json::{Map, Value};

const SCRIPT_INTERPRETER: &str = "scriptInterpreter";
const LEGACY_ARGS_QUOTED: &str = "interpreterArgsQuoted";
const INVOCATION_STRING: &str = "invocationString";
const ARGS_QUOTED: &str = "argsQuoted";

/// Script interpreter as it's found in the wire step. Different API versions use different shapes,
/// both are resolved to the same `ScriptInterpreter` right away.
#[derive(Debug, PartialEq)]
enum WireScriptInterpreter<'w> {
    /// `scriptInterpreter: "bash"` with a sibling `interpreterArgsQuoted: true`.
    Legacy {
        invocation_string: &'w Value,
        args_quoted: Option<&'w Value>,
    },
    /// `scriptInterpreter: { invocationString: "bash", argsQuoted: true }`.
    Current(&'w Map<String, Value>),
}

impl<'w> WireScriptInterpreter<'w> {
    fn detect(step: &'w Map<String, Value>, path: &FieldPath) -> Result<Option<Self>, Error> {
        Ok(match optional_value(step, SCRIPT_INTERPRETER) {
            None => None,
            Some(Value::Object(interpreter)) => Some(Self::Current(interpreter)),
            Some(invocation_string @ Value::String(_)) => Some(Self::Legacy {
                invocation_string,
                args_quoted: optional_value(step, LEGACY_ARGS_QUOTED),
            }),
            Some(_) => {
                return Err(Error::malformed(
                    path.child(SCRIPT_INTERPRETER),
                    "expected either a string or an object.",
                ))
            }
        })
    }

    fn resolve(self, path: &FieldPath) -> Result<(Option<String>, bool), Error> {
        let path = path.child(SCRIPT_INTERPRETER);
        let (invocation_string, args_quoted) = match self {
            Self::Legacy {
                invocation_string,
                args_quoted,
            } => (
                Some(read_string(invocation_string, &path)?),
                args_quoted
                    .map(|value| read_bool(value, &path.child(LEGACY_ARGS_QUOTED)))
                    .transpose()?,
            ),
            Self::Current(interpreter) => (
                optional_value(interpreter, INVOCATION_STRING)
                    .map(|value| read_string(value, &path.child(INVOCATION_STRING)))
                    .transpose()?,
                optional_value(interpreter, ARGS_QUOTED)
                    .map(|value| read_bool(value, &path.child(ARGS_QUOTED)))
                    .transpose()?,
            ),
        };

        Ok((
            invocation_string.filter(|value| !value.trim().is_empty()),
            args_quoted.unwrap_or_default(),
        ))
    }
}

/// Writes the script interpreter into the wire step using the configured shape.
pub(super) fn script_interpreter_to_wire(
    interpreter: &ScriptInterpreter,
    step: &mut Map<String, Value>,
    cx: &mut ConversionContext,
    path: &FieldPath,
) -> Result<(), Error> {
    if interpreter.invocation_string.trim().is_empty() {
        return cx.skip(
            &path.child("script_interpreter"),
            "script interpreter invocation string is missing.",
        );
    }

    match cx.config.script_interpreter_shape {
        ScriptInterpreterShape::Legacy => {
            step.insert(
                SCRIPT_INTERPRETER.to_string(),
                Value::String(interpreter.invocation_string.clone()),
            );
            if interpreter.args_quoted {
                step.insert(LEGACY_ARGS_QUOTED.to_string(), Value::Bool(true));
            }
        }
        ScriptInterpreterShape::Current => {
            let mut wire = Map::new();
            wire.insert(
                INVOCATION_STRING.to_string(),
                Value::String(interpreter.invocation_string.clone()),
            );
            if interpreter.args_quoted {
                wire.insert(ARGS_QUOTED.to_string(), Value::Bool(true));
            }
            step.insert(SCRIPT_INTERPRETER.to_string(), Value::Object(wire));
        }
    }

    Ok(())
}

/// Reads the script interpreter of the wire step, accepts both legacy and current shapes.
pub(super) fn script_interpreter_from_wire(
    step: &Map<String, Value>,
    cx: &mut ConversionContext,
    path: &FieldPath,
) -> Result<Option<ScriptInterpreter>, Error> {
    let Some(interpreter) = WireScriptInterpreter::detect(step, path)? else {
        return Ok(None);
    };

    match interpreter.resolve(path)? {
        (Some(invocation_string), args_quoted) => Ok(Some(ScriptInterpreter {
            invocation_string,
            args_quoted,
        })),
        (None, _) => {
            cx.skip(
                &path.child(SCRIPT_INTERPRETER),
                "script interpreter invocation string is missing.",
            )?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        script_interpreter_from_wire, script_interpreter_to_wire, WireScriptInterpreter,
    };
    use crate::{
        config::{ConverterConfig, ScriptInterpreterShape},
        wire::{ConversionContext, Direction, FieldPath},
    };
    use jobwire_types::jobs::ScriptInterpreter;
    use serde_json::{json, Map, Value};

    fn interpreter() -> ScriptInterpreter {
        ScriptInterpreter {
            invocation_string: "sudo -u deploy bash".to_string(),
            args_quoted: true,
        }
    }

    fn to_wire(shape: ScriptInterpreterShape) -> anyhow::Result<Value> {
        let config = ConverterConfig {
            script_interpreter_shape: shape,
            ..Default::default()
        };
        let mut cx = ConversionContext::new(&config, Direction::ToWire);
        let mut step = Map::new();
        script_interpreter_to_wire(&interpreter(), &mut step, &mut cx, &FieldPath::root("step"))?;
        Ok(Value::Object(step))
    }

    fn from_wire(step: Value) -> anyhow::Result<Option<ScriptInterpreter>> {
        let config = ConverterConfig::default();
        let mut cx = ConversionContext::new(&config, Direction::FromWire);
        Ok(script_interpreter_from_wire(
            step.as_object().unwrap(),
            &mut cx,
            &FieldPath::root("step"),
        )?)
    }

    #[test]
    fn emits_configured_shape() -> anyhow::Result<()> {
        assert_eq!(
            to_wire(ScriptInterpreterShape::Current)?,
            json!({
                "scriptInterpreter": { "invocationString": "sudo -u deploy bash", "argsQuoted": true }
            })
        );
        assert_eq!(
            to_wire(ScriptInterpreterShape::Legacy)?,
            json!({
                "scriptInterpreter": "sudo -u deploy bash",
                "interpreterArgsQuoted": true
            })
        );

        Ok(())
    }

    #[test]
    fn reads_both_shapes() -> anyhow::Result<()> {
        for shape in [ScriptInterpreterShape::Current, ScriptInterpreterShape::Legacy] {
            assert_eq!(from_wire(to_wire(shape)?)?, Some(interpreter()));
        }

        assert_eq!(
            from_wire(json!({ "scriptInterpreter": { "invocationString": "bash", "argsQuoted": "false" } }))?,
            Some(ScriptInterpreter {
                invocation_string: "bash".to_string(),
                args_quoted: false
            })
        );
        assert_eq!(from_wire(json!({ "exec": "uptime" }))?, None);
        assert_eq!(from_wire(json!({ "scriptInterpreter": { "argsQuoted": true } }))?, None);
        assert!(from_wire(json!({ "scriptInterpreter": 42 })).is_err());

        Ok(())
    }

    #[test]
    fn detects_shape() -> anyhow::Result<()> {
        let step = json!({ "scriptInterpreter": "bash" });
        assert_eq!(
            WireScriptInterpreter::detect(step.as_object().unwrap(), &FieldPath::root("step"))?,
            Some(WireScriptInterpreter::Legacy {
                invocation_string: &json!("bash"),
                args_quoted: None
            })
        );

        Ok(())
    }
}
