use crate::{
    error::Error,
    wire::{
        converters::WireBlock,
        field_mapper::{read_fields, write_fields, Accessor, FieldMapping, Presence},
        ConversionContext, FieldPath,
    },
};
use jobwire_types::jobs::Plugin;
use serde_json::{Map, Value};

static PLUGIN_FIELDS: &[FieldMapping<Plugin>] = &[
    FieldMapping::new(
        "type",
        "type",
        Presence::Always,
        Accessor::Str(|p| &p.plugin_type, |p| &mut p.plugin_type),
    ),
    FieldMapping::new(
        "config",
        "configuration",
        Presence::NonEmpty,
        Accessor::Map(|p| &p.config, |p| &mut p.config),
    ),
];

impl WireBlock for Plugin {
    const BLOCK: &'static str = "plugin";

    fn to_wire(
        &self,
        cx: &mut ConversionContext,
        path: &FieldPath,
    ) -> Result<Option<Map<String, Value>>, Error> {
        if self.plugin_type.trim().is_empty() {
            cx.skip(path, "plugin type is missing.")?;
            return Ok(None);
        }

        let mut wire = Map::new();
        write_fields(
            PLUGIN_FIELDS,
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
        let mut plugin = Plugin::default();
        read_fields(PLUGIN_FIELDS, wire, &mut plugin, path)?;
        if plugin.plugin_type.trim().is_empty() {
            cx.skip(path, "plugin type is missing.")?;
            return Ok(None);
        }

        Ok(Some(plugin))
    }
}
