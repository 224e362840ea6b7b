use crate::{
    error::Error,
    wire::{
        converters::{optional_object, optional_value, WireBlock},
        field_mapper::{read_string, read_u64},
        ConversionContext, FieldPath,
    },
};
use jobwire_types::jobs::{Orchestrator, OrchestratorSort};
use serde_json::{json, Map, Value};

const SUBSET: &str = "subset";
const RANK_TIERED: &str = "rankTiered";
const MAX_PERCENTAGE: &str = "maxPercentage";
const HIGHEST_LOWEST: &str = "orchestrator-highest-lowest";

impl WireBlock for Orchestrator {
    const BLOCK: &'static str = "orchestrator";

    fn to_wire(
        &self,
        cx: &mut ConversionContext,
        path: &FieldPath,
    ) -> Result<Option<Map<String, Value>>, Error> {
        let (orchestrator_type, configuration) = match self {
            Orchestrator::Subset { count } => (SUBSET, json!({ "count": count.to_string() })),
            Orchestrator::RankTiered => (RANK_TIERED, json!({})),
            Orchestrator::MaxPercentage { percent } => {
                (MAX_PERCENTAGE, json!({ "percent": percent.to_string() }))
            }
            Orchestrator::HighestLowest { attribute, sort } => {
                if attribute.trim().is_empty() {
                    cx.skip(&path.child("attribute"), "orchestrator attribute is missing.")?;
                    return Ok(None);
                }
                (
                    HIGHEST_LOWEST,
                    json!({ "attribute": attribute, "sort": sort.as_str() }),
                )
            }
        };

        let mut wire = Map::new();
        wire.insert("type".to_string(), Value::String(orchestrator_type.to_string()));
        wire.insert("configuration".to_string(), configuration);
        Ok(Some(wire))
    }

    fn from_wire(
        wire: &Map<String, Value>,
        cx: &mut ConversionContext,
        path: &FieldPath,
    ) -> Result<Option<Self>, Error> {
        let Some(orchestrator_type) = optional_value(wire, "type")
            .map(|value| read_string(value, &path.child("type")))
            .transpose()?
        else {
            cx.skip(path, "orchestrator type is missing.")?;
            return Ok(None);
        };

        let configuration = optional_object(wire, "configuration", path)?;
        let configuration_path = path.child("configuration");
        let param = |name: &str| {
            configuration
                .and_then(|configuration| optional_value(configuration, name))
                .map(|value| (value, configuration_path.child(name)))
        };

        let orchestrator = match orchestrator_type.as_str() {
            SUBSET => param("count")
                .map(|(count, path)| read_u64(count, &path))
                .transpose()?
                .map(|count| Orchestrator::Subset { count }),
            RANK_TIERED => Some(Orchestrator::RankTiered),
            MAX_PERCENTAGE => param("percent")
                .map(|(percent, path)| read_u64(percent, &path))
                .transpose()?
                .map(|percent| Orchestrator::MaxPercentage { percent }),
            HIGHEST_LOWEST => {
                let attribute = param("attribute")
                    .map(|(attribute, path)| read_string(attribute, &path))
                    .transpose()?
                    .filter(|attribute| !attribute.trim().is_empty());
                let sort = param("sort")
                    .map(|(sort, path)| match read_string(sort, &path)?.as_str() {
                        "highest" => Ok(OrchestratorSort::Highest),
                        "lowest" => Ok(OrchestratorSort::Lowest),
                        sort => Err(Error::malformed(
                            &path,
                            format!("unknown sort direction `{sort}`, expected `highest` or `lowest`."),
                        )),
                    })
                    .transpose()?;
                attribute
                    .zip(sort)
                    .map(|(attribute, sort)| Orchestrator::HighestLowest { attribute, sort })
            }
            unknown => {
                cx.skip(
                    &path.child("type"),
                    format!("unknown orchestrator type `{unknown}`."),
                )?;
                return Ok(None);
            }
        };

        if orchestrator.is_none() {
            cx.skip(
                &configuration_path,
                format!("`{orchestrator_type}` orchestrator configuration is incomplete."),
            )?;
        }

        Ok(orchestrator)
    }
}
