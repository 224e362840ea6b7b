use crate::{
    error::Error,
    wire::{
        converters::{object, WireBlock},
        field_mapper::{
            read_fields, write_fields, Accessor, FieldMapping, ListEncoding, Presence,
        },
        ConversionContext, FieldPath,
    },
};
use jobwire_types::jobs::JobOption;
use serde_json::{Map, Value};

static JOB_OPTION_FIELDS: &[FieldMapping<JobOption>] = &[
    FieldMapping::new(
        "name",
        "name",
        Presence::Always,
        Accessor::Str(|o| &o.name, |o| &mut o.name),
    ),
    FieldMapping::new(
        "label",
        "label",
        Presence::NonEmpty,
        Accessor::OptStr(|o| &o.label, |o| &mut o.label),
    ),
    FieldMapping::new(
        "description",
        "description",
        Presence::NonEmpty,
        Accessor::OptStr(|o| &o.description, |o| &mut o.description),
    ),
    FieldMapping::new(
        "default_value",
        "value",
        Presence::NonEmpty,
        Accessor::OptStr(|o| &o.default_value, |o| &mut o.default_value),
    ),
    FieldMapping::new(
        "value_choices",
        "values",
        Presence::NonEmpty,
        Accessor::List(
            |o| &o.value_choices,
            |o| &mut o.value_choices,
            ListEncoding::Array,
        ),
    ),
    FieldMapping::new(
        "value_choices_url",
        "valuesUrl",
        Presence::NonEmpty,
        Accessor::OptStr(|o| &o.value_choices_url, |o| &mut o.value_choices_url),
    ),
    FieldMapping::new(
        "require_predefined_choice",
        "enforcedValues",
        Presence::NonEmpty,
        Accessor::Bool(
            |o| &o.require_predefined_choice,
            |o| &mut o.require_predefined_choice,
        ),
    ),
    FieldMapping::new(
        "validation_regex",
        "regex",
        Presence::NonEmpty,
        Accessor::OptStr(|o| &o.validation_regex, |o| &mut o.validation_regex),
    ),
    FieldMapping::new(
        "required",
        "required",
        Presence::NonEmpty,
        Accessor::Bool(|o| &o.required, |o| &mut o.required),
    ),
    FieldMapping::new(
        "allow_multiple_values",
        "multivalued",
        Presence::NonEmpty,
        Accessor::Bool(|o| &o.allow_multiple_values, |o| &mut o.allow_multiple_values),
    ),
    FieldMapping::new(
        "multi_value_delimiter",
        "delimiter",
        Presence::NonEmpty,
        Accessor::OptStr(|o| &o.multi_value_delimiter, |o| &mut o.multi_value_delimiter),
    ),
    FieldMapping::new(
        "obscure_input",
        "secure",
        Presence::NonEmpty,
        Accessor::Bool(|o| &o.obscure_input, |o| &mut o.obscure_input),
    ),
    FieldMapping::new(
        "exposed_to_scripts",
        "valueExposed",
        Presence::NonEmpty,
        Accessor::Bool(|o| &o.exposed_to_scripts, |o| &mut o.exposed_to_scripts),
    ),
    FieldMapping::new(
        "storage_path",
        "storagePath",
        Presence::NonEmpty,
        Accessor::OptStr(|o| &o.storage_path, |o| &mut o.storage_path),
    ),
    FieldMapping::new(
        "is_date",
        "isDate",
        Presence::NonEmpty,
        Accessor::Bool(|o| &o.is_date, |o| &mut o.is_date),
    ),
    FieldMapping::new(
        "date_format",
        "dateFormat",
        Presence::NonEmpty,
        Accessor::OptStr(|o| &o.date_format, |o| &mut o.date_format),
    ),
    FieldMapping::new(
        "hidden",
        "hidden",
        Presence::NonEmpty,
        Accessor::Bool(|o| &o.hidden, |o| &mut o.hidden),
    ),
    FieldMapping::new(
        "sort_values",
        "sortValues",
        Presence::NonEmpty,
        Accessor::Bool(|o| &o.sort_values, |o| &mut o.sort_values),
    ),
    FieldMapping::new(
        "option_type",
        "type",
        Presence::NonEmpty,
        Accessor::OptStr(|o| &o.option_type, |o| &mut o.option_type),
    ),
];

impl WireBlock for JobOption {
    const BLOCK: &'static str = "option";

    fn to_wire(
        &self,
        cx: &mut ConversionContext,
        path: &FieldPath,
    ) -> Result<Option<Map<String, Value>>, Error> {
        if !self.obscure_input {
            if self.storage_path.as_deref().is_some_and(|storage_path| !storage_path.is_empty()) {
                return Err(Error::invariant(
                    path.child("storage_path"),
                    "`storage_path` can only be set when `obscure_input` is enabled.",
                ));
            }

            if self.exposed_to_scripts {
                return Err(Error::invariant(
                    path.child("exposed_to_scripts"),
                    "`exposed_to_scripts` can only be enabled when `obscure_input` is enabled.",
                ));
            }
        }

        if self.name.trim().is_empty() {
            cx.skip(path, "option name is missing.")?;
            return Ok(None);
        }

        let mut wire = Map::new();
        write_fields(
            JOB_OPTION_FIELDS,
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
        let mut option = JobOption::default();
        read_fields(JOB_OPTION_FIELDS, wire, &mut option, path)?;
        if option.name.trim().is_empty() {
            cx.skip(path, "option name is missing.")?;
            return Ok(None);
        }

        Ok(Some(option))
    }
}

/// Reads job options given either as an array or as an object keyed by the option name.
pub(crate) fn options_from_wire(
    value: &Value,
    cx: &mut ConversionContext,
    path: &FieldPath,
) -> Result<Vec<JobOption>, Error> {
    let mut options = vec![];
    match value {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let path = path.index(index);
                options.extend(JobOption::from_wire(object(item, &path)?, cx, &path)?);
            }
        }
        Value::Object(items) => {
            for (name, item) in items {
                let path = path.child(name);
                let mut option = object(item, &path)?.clone();
                option
                    .entry("name")
                    .or_insert_with(|| Value::String(name.clone()));
                options.extend(JobOption::from_wire(&option, cx, &path)?);
            }
        }
        Value::Null => {}
        _ => {
            return Err(Error::malformed(
                path,
                "expected either an array or an object.",
            ))
        }
    }

    Ok(options)
}
