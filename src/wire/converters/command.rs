use crate::{
    error::Error,
    wire::{
        converters::{
            at_most_one,
            error_handler::ERROR_HANDLER,
            optional_object,
            step::{step_from_wire, step_to_wire},
            WireBlock,
        },
        ConversionContext, FieldPath,
    },
};
use jobwire_types::jobs::{Command, ErrorHandler};
use serde_json::{Map, Value};

impl WireBlock for Command {
    const BLOCK: &'static str = "command";

    fn to_wire(
        &self,
        cx: &mut ConversionContext,
        path: &FieldPath,
    ) -> Result<Option<Map<String, Value>>, Error> {
        let mut wire = step_to_wire(&self.step, cx, path)?;
        if let Some(error_handler) = at_most_one(&self.error_handlers, ErrorHandler::BLOCK, path)? {
            if let Some(error_handler) =
                error_handler.to_wire(cx, &path.child(ErrorHandler::BLOCK))?
            {
                wire.insert(ERROR_HANDLER.to_string(), Value::Object(error_handler));
            }
        }

        Ok(Some(wire))
    }

    fn from_wire(
        wire: &Map<String, Value>,
        cx: &mut ConversionContext,
        path: &FieldPath,
    ) -> Result<Option<Self>, Error> {
        let step = step_from_wire(wire, cx, path)?;
        let error_handlers = match optional_object(wire, ERROR_HANDLER, path)? {
            Some(error_handler) => {
                ErrorHandler::from_wire(error_handler, cx, &path.child(ERROR_HANDLER))?
                    .into_iter()
                    .collect()
            }
            None => vec![],
        };

        Ok(Some(Command {
            step,
            error_handlers,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::ConverterConfig,
        error::Error,
        wire::{converters::WireBlock, ConversionContext, Direction, FieldPath},
    };
    use insta::assert_json_snapshot;
    use jobwire_types::jobs::{Command, ErrorHandler, JobReference, StepDefinition};

    #[test]
    fn converts_to_and_from_wire() -> anyhow::Result<()> {
        let command = Command {
            error_handlers: vec![ErrorHandler {
                step: StepDefinition {
                    job_references: vec![JobReference::named("notify-on-call")],
                    ..Default::default()
                },
                keep_going_on_success: false,
            }],
            ..Command::shell("./deploy.sh")
        };

        let config = ConverterConfig::default();
        let mut cx = ConversionContext::new(&config, Direction::ToWire);
        let wire = command
            .to_wire(&mut cx, &FieldPath::root("command"))?
            .unwrap_or_default();
        assert_json_snapshot!(wire, @r###"
        {
          "errorhandler": {
            "jobref": {
              "name": "notify-on-call"
            }
          },
          "exec": "./deploy.sh"
        }
        "###);

        let mut cx = ConversionContext::new(&config, Direction::FromWire);
        assert_eq!(
            Command::from_wire(&wire, &mut cx, &FieldPath::root("commands"))?,
            Some(command)
        );

        Ok(())
    }

    #[test]
    fn fails_for_too_many_error_handlers() {
        let command = Command {
            error_handlers: vec![ErrorHandler::default(), ErrorHandler::default()],
            ..Command::script("echo hi")
        };

        let config = ConverterConfig::default();
        let mut cx = ConversionContext::new(&config, Direction::ToWire);
        assert_eq!(
            command
                .to_wire(&mut cx, &FieldPath::root("job").child("command").index(3))
                .unwrap_err(),
            Error::TooManyNestedBlocks {
                block: "error_handler".to_string(),
                parent: "job.command[3]".to_string(),
                max: 1,
                found: 2
            }
        );
    }
}
