mod converter_config;
mod raw_config;

pub use self::{
    converter_config::{ConverterConfig, MapEncoding, ScriptInterpreterShape},
    raw_config::RawConfig,
};

/// Main application config.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Whether to pretty-print the produced wire documents.
    pub pretty: bool,
    /// Context passed to every document conversion.
    pub converter: ConverterConfig,
}

impl AsRef<Config> for Config {
    fn as_ref(&self) -> &Config {
        self
    }
}

impl From<RawConfig> for Config {
    fn from(raw_config: RawConfig) -> Self {
        Self {
            pretty: raw_config.pretty,
            converter: raw_config.converter,
        }
    }
}
