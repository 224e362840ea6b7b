use crate::{
    error::Error,
    wire::{
        converters::WireBlock,
        field_mapper::{read_fields, write_fields, Accessor, FieldMapping, Presence},
        ConversionContext, FieldPath,
    },
};
use jobwire_types::jobs::NodeFilter;
use serde_json::{Map, Value};

static NODE_FILTER_FIELDS: &[FieldMapping<NodeFilter>] = &[
    FieldMapping::new(
        "filter_query",
        "filter",
        Presence::NonEmpty,
        Accessor::OptStr(|f| &f.filter_query, |f| &mut f.filter_query),
    ),
    FieldMapping::new(
        "exclude_query",
        "filterExclude",
        Presence::NonEmpty,
        Accessor::OptStr(|f| &f.exclude_query, |f| &mut f.exclude_query),
    ),
    FieldMapping::new(
        "exclude_precedence",
        "excludePrecedence",
        Presence::NonEmpty,
        Accessor::Bool(|f| &f.exclude_precedence, |f| &mut f.exclude_precedence),
    ),
];

impl WireBlock for NodeFilter {
    const BLOCK: &'static str = "node_filter";

    fn to_wire(
        &self,
        cx: &mut ConversionContext,
        _: &FieldPath,
    ) -> Result<Option<Map<String, Value>>, Error> {
        let mut wire = Map::new();
        write_fields(
            NODE_FILTER_FIELDS,
            self,
            &mut wire,
            cx.config.plugin_config_encoding,
        );
        Ok(Some(wire))
    }

    fn from_wire(
        wire: &Map<String, Value>,
        _: &mut ConversionContext,
        path: &FieldPath,
    ) -> Result<Option<Self>, Error> {
        let mut node_filter = NodeFilter::default();
        read_fields(NODE_FILTER_FIELDS, wire, &mut node_filter, path)?;
        Ok(Some(node_filter))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::ConverterConfig,
        wire::{converters::WireBlock, ConversionContext, Direction, FieldPath},
    };
    use jobwire_types::jobs::NodeFilter;
    use serde_json::{json, Value};

    #[test]
    fn converts_to_and_from_wire() -> anyhow::Result<()> {
        let node_filter = NodeFilter {
            filter_query: Some("tags: web".to_string()),
            exclude_query: Some("name: web3".to_string()),
            exclude_precedence: true,
        };

        let config = ConverterConfig::default();
        let mut cx = ConversionContext::new(&config, Direction::ToWire);
        let wire = node_filter
            .to_wire(&mut cx, &FieldPath::root("node_filter"))?
            .map(Value::Object);
        assert_eq!(
            wire,
            Some(json!({ "filter": "tags: web", "filterExclude": "name: web3", "excludePrecedence": true }))
        );

        let mut cx = ConversionContext::new(&config, Direction::FromWire);
        let wire = wire.unwrap_or_default();
        assert_eq!(
            NodeFilter::from_wire(wire.as_object().unwrap(), &mut cx, &FieldPath::root("nodefilters"))?,
            Some(node_filter)
        );

        // Empty filter block is still emitted.
        let mut cx = ConversionContext::new(&config, Direction::ToWire);
        assert_eq!(
            NodeFilter::default()
                .to_wire(&mut cx, &FieldPath::root("node_filter"))?
                .map(Value::Object),
            Some(json!({}))
        );

        Ok(())
    }
}
