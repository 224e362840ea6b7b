use crate::{config::ConverterConfig, error::Error, wire::FieldPath};
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Result of a successful conversion along with the elements that were skipped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

/// Describes an element dropped from the conversion result because it misses a required sub-field.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: {}", self.path, self.message)
    }
}

/// Direction of the conversion, determines the error reported for skippable defects in strict
/// mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Direction {
    ToWire,
    FromWire,
}

/// State shared by the block converters during a single document conversion.
pub(crate) struct ConversionContext<'c> {
    pub config: &'c ConverterConfig,
    direction: Direction,
    diagnostics: Vec<Diagnostic>,
}

impl<'c> ConversionContext<'c> {
    pub fn new(config: &'c ConverterConfig, direction: Direction) -> Self {
        Self {
            config,
            direction,
            diagnostics: vec![],
        }
    }

    /// Records that the element at the specified path is dropped. Fails instead if the config
    /// doesn't allow skipping invalid elements.
    pub fn skip<M: Into<String>>(&mut self, path: &FieldPath, message: M) -> Result<(), Error> {
        let message = message.into();
        if !self.config.skip_invalid_elements {
            return Err(match self.direction {
                Direction::ToWire => Error::invariant(path, message),
                Direction::FromWire => Error::malformed(path, message),
            });
        }

        warn!(path = %path, "Skipping element: {message}");
        self.diagnostics.push(Diagnostic {
            path: path.to_string(),
            message,
        });

        Ok(())
    }

    /// Wraps the conversion result together with the collected diagnostics.
    pub fn finish<T>(self, value: T) -> Conversion<T> {
        Conversion {
            value,
            diagnostics: self.diagnostics,
        }
    }
}
