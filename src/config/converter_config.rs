use serde::{Deserialize, Serialize};

/// Shape used to emit the script interpreter of a workflow step.
#[derive(Deserialize, Serialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScriptInterpreterShape {
    /// Flat `scriptInterpreter` string with a sibling `interpreterArgsQuoted` flag.
    Legacy,
    /// Nested `scriptInterpreter` object with `invocationString` and `argsQuoted`.
    #[default]
    Current,
}

/// Encoding used to emit untyped plugin configuration maps.
#[derive(Deserialize, Serialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MapEncoding {
    /// JSON object with the keys sorted.
    #[default]
    Json,
    /// String with the `<configuration><entry key=".." value=".."/></configuration>` XML.
    Xml,
}

/// Context passed to every document conversion.
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Shape of the emitted script interpreter, both shapes are always accepted on read.
    pub script_interpreter_shape: ScriptInterpreterShape,
    /// Encoding of the emitted plugin configuration, both encodings are always accepted on read.
    pub plugin_config_encoding: MapEncoding,
    /// Drop elements with missing required sub-fields (and report them as diagnostics) instead of
    /// failing the whole conversion.
    pub skip_invalid_elements: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            script_interpreter_shape: ScriptInterpreterShape::default(),
            plugin_config_encoding: MapEncoding::default(),
            skip_invalid_elements: true,
        }
    }
}
