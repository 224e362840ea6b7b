use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A plugin instance: workflow step, node step, or notification plugin.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Hash, PartialEq, Eq)]
pub struct Plugin {
    /// Plugin provider name, e.g. `localexec` or `HttpNotification`.
    #[serde(rename = "type", default)]
    pub plugin_type: String,
    /// Untyped plugin configuration.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, String>,
}

impl Plugin {
    /// Creates plugin instance of the specified type with the specified configuration entries.
    pub fn new<T, I, K, V>(plugin_type: T, config: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            plugin_type: plugin_type.into(),
            config: config
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
