use crate::config::ConverterConfig;
use figment::{providers, providers::Format, Figment};
use serde::{Deserialize, Serialize};

/// Raw configuration structure that is used to read the configuration from the file.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfig {
    /// Whether to pretty-print the produced wire documents.
    pub pretty: bool,
    /// Configuration of the document converter.
    pub converter: ConverterConfig,
}

impl RawConfig {
    /// Reads the configuration from the file (TOML) and merges it with the default values and
    /// `JOBWIRE_`-prefixed environment variables.
    pub fn read_from_file(path: &str) -> anyhow::Result<Self> {
        Ok(
            Figment::from(providers::Serialized::defaults(Self::default()))
                .merge(providers::Toml::file(path))
                .merge(providers::Env::prefixed("JOBWIRE_").split("__"))
                .extract()?,
        )
    }
}
