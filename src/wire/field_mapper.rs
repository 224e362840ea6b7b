use crate::{
    config::MapEncoding,
    error::Error,
    wire::{
        map_codec::{decode_map, encode_map},
        FieldPath,
    },
};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fmt};
use tracing::debug;

/// Decides whether a config value is emitted to the wire document. An omitted field means "use
/// the remote default".
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Presence {
    /// Always emitted (for optional values: unless null).
    Always,
    /// Emitted unless null, empty string, empty collection, `false`, or `0`.
    NonEmpty,
    /// Emitted unless null.
    NonNull,
}

/// Semantic type of a mapped field.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum FieldType {
    String,
    Bool,
    Int,
    StringList,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "a string",
            Self::Bool => "a boolean",
            Self::Int => "a non-negative integer",
            Self::StringList => "a list of strings",
        })
    }
}

/// How a list of strings is represented on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ListEncoding {
    /// JSON array of strings.
    Array,
    /// Single comma-joined string.
    Joined,
}

/// Pair of getter and mutable getter of a config block field.
pub(crate) enum Accessor<C> {
    Str(fn(&C) -> &String, fn(&mut C) -> &mut String),
    OptStr(fn(&C) -> &Option<String>, fn(&mut C) -> &mut Option<String>),
    Bool(fn(&C) -> &bool, fn(&mut C) -> &mut bool),
    OptBool(fn(&C) -> &Option<bool>, fn(&mut C) -> &mut Option<bool>),
    Int(fn(&C) -> &Option<u64>, fn(&mut C) -> &mut Option<u64>),
    List(
        fn(&C) -> &Vec<String>,
        fn(&mut C) -> &mut Vec<String>,
        ListEncoding,
    ),
    Map(
        fn(&C) -> &BTreeMap<String, String>,
        fn(&mut C) -> &mut BTreeMap<String, String>,
    ),
}

/// Single row of a bidirectional field table: `config_name ↔ wire_name`.
pub(crate) struct FieldMapping<C> {
    pub config_name: &'static str,
    pub wire_name: &'static str,
    /// Historical wire names that are accepted on read, but never emitted.
    pub legacy_names: &'static [&'static str],
    pub presence: Presence,
    pub accessor: Accessor<C>,
}

impl<C> FieldMapping<C> {
    pub const fn new(
        config_name: &'static str,
        wire_name: &'static str,
        presence: Presence,
        accessor: Accessor<C>,
    ) -> Self {
        Self {
            config_name,
            wire_name,
            legacy_names: &[],
            presence,
            accessor,
        }
    }

    /// Creates mapping for a field that had other wire names in the past.
    pub const fn aliased(
        config_name: &'static str,
        wire_name: &'static str,
        legacy_names: &'static [&'static str],
        presence: Presence,
        accessor: Accessor<C>,
    ) -> Self {
        Self {
            config_name,
            wire_name,
            legacy_names,
            presence,
            accessor,
        }
    }

    /// Returns the wire value of the field if its presence rule is satisfied.
    fn to_wire(&self, value: &C, encoding: MapEncoding) -> Option<Value> {
        let (wire_value, is_empty) = match &self.accessor {
            Accessor::Str(get, _) => {
                let value = get(value);
                (Value::String(value.clone()), value.is_empty())
            }
            Accessor::OptStr(get, _) => {
                let value = get(value).as_ref()?;
                (Value::String(value.clone()), value.is_empty())
            }
            Accessor::Bool(get, _) => (Value::Bool(*get(value)), !*get(value)),
            Accessor::OptBool(get, _) => {
                let value = (*get(value))?;
                (Value::Bool(value), !value)
            }
            Accessor::Int(get, _) => {
                let value = (*get(value))?;
                (Value::from(value), value == 0)
            }
            Accessor::List(get, _, encoding) => {
                let value = get(value);
                match encoding {
                    ListEncoding::Array => (
                        Value::Array(value.iter().cloned().map(Value::String).collect()),
                        value.is_empty(),
                    ),
                    // Items are trimmed on read, blank ones are dropped.
                    ListEncoding::Joined => {
                        let items = value
                            .iter()
                            .map(|item| item.trim())
                            .filter(|item| !item.is_empty())
                            .collect::<Vec<_>>();
                        (Value::String(items.join(",")), items.is_empty())
                    }
                }
            }
            Accessor::Map(get, _) => {
                let value = get(value);
                (encode_map(value, encoding), value.is_empty())
            }
        };

        match self.presence {
            Presence::NonEmpty if is_empty => None,
            _ => Some(wire_value),
        }
    }

    /// Reads the field from the wire object. Absent and null values leave the config field
    /// untouched.
    fn from_wire(
        &self,
        wire: &Map<String, Value>,
        value: &mut C,
        path: &FieldPath,
    ) -> Result<(), Error> {
        let Some((wire_name, wire_value)) = std::iter::once(self.wire_name)
            .chain(self.legacy_names.iter().copied())
            .find_map(|name| match wire.get(name) {
                None | Some(Value::Null) => None,
                Some(wire_value) => Some((name, wire_value)),
            })
        else {
            return Ok(());
        };

        if wire_name != self.wire_name {
            debug!(
                field = self.config_name,
                wire_name, "Reading field from a legacy wire name."
            );
        }

        let path = path.child(wire_name);
        match &self.accessor {
            Accessor::Str(_, set) => *set(value) = read_string(wire_value, &path)?,
            Accessor::OptStr(_, set) => {
                let wire_value = read_string(wire_value, &path)?;
                *set(value) = if wire_value.is_empty() && self.presence == Presence::NonEmpty {
                    None
                } else {
                    Some(wire_value)
                };
            }
            Accessor::Bool(_, set) => *set(value) = read_bool(wire_value, &path)?,
            Accessor::OptBool(_, set) => *set(value) = Some(read_bool(wire_value, &path)?),
            Accessor::Int(_, set) => *set(value) = Some(read_u64(wire_value, &path)?),
            Accessor::List(_, set, _) => *set(value) = read_string_list(wire_value, &path)?,
            Accessor::Map(_, set) => {
                *set(value) = decode_map(wire_value)
                    .map_err(|source| Error::MalformedMap {
                        path: path.to_string(),
                        source,
                    })?
            }
        }

        Ok(())
    }
}

/// Emits all fields of the table whose presence rule is satisfied into the wire object.
pub(crate) fn write_fields<C>(
    fields: &[FieldMapping<C>],
    value: &C,
    wire: &mut Map<String, Value>,
    encoding: MapEncoding,
) {
    for field in fields {
        if let Some(wire_value) = field.to_wire(value, encoding) {
            wire.insert(field.wire_name.to_string(), wire_value);
        }
    }
}

/// Reads all fields of the table from the wire object. Fields missing in the wire object keep
/// their current (default) config value.
pub(crate) fn read_fields<C>(
    fields: &[FieldMapping<C>],
    wire: &Map<String, Value>,
    value: &mut C,
    path: &FieldPath,
) -> Result<(), Error> {
    for field in fields {
        field.from_wire(wire, value, path)?;
    }

    Ok(())
}

/// Reads a string, numbers and booleans are accepted and converted to strings.
pub(crate) fn read_string(value: &Value, path: &FieldPath) -> Result<String, Error> {
    match value {
        Value::String(value) => Ok(value.clone()),
        Value::Number(value) => Ok(value.to_string()),
        Value::Bool(value) => Ok(value.to_string()),
        _ => Err(unexpected_type(FieldType::String, value, path)),
    }
}

/// Reads a boolean, `"true"` and `"false"` strings are accepted as well.
pub(crate) fn read_bool(value: &Value, path: &FieldPath) -> Result<bool, Error> {
    match value {
        Value::Bool(value) => Ok(*value),
        Value::String(value) if value.trim().eq_ignore_ascii_case("true") => Ok(true),
        Value::String(value) if value.trim().eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(unexpected_type(FieldType::Bool, value, path)),
    }
}

/// Reads a non-negative integer, numeric strings are accepted as well.
pub(crate) fn read_u64(value: &Value, path: &FieldPath) -> Result<u64, Error> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| unexpected_type(FieldType::Int, value, path)),
        Value::String(number) => number
            .trim()
            .parse::<u64>()
            .map_err(|_| unexpected_type(FieldType::Int, value, path)),
        _ => Err(unexpected_type(FieldType::Int, value, path)),
    }
}

/// Reads a list of strings given either as an array or as a comma-joined string.
pub(crate) fn read_string_list(value: &Value, path: &FieldPath) -> Result<Vec<String>, Error> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| read_string(item, &path.index(index)))
            .collect(),
        Value::String(items) => Ok(items
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()),
        _ => Err(unexpected_type(FieldType::StringList, value, path)),
    }
}

fn unexpected_type(expected: FieldType, value: &Value, path: &FieldPath) -> Error {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };

    Error::malformed(path, format!("expected {expected}, found {found}."))
}

#[cfg(test)]
mod tests {
    use super::{
        read_fields, read_string_list, write_fields, Accessor, FieldMapping, FieldType,
        ListEncoding, Presence,
    };
    use crate::{
        config::MapEncoding,
        error::{Error, ErrorKind},
        wire::FieldPath,
    };
    use insta::assert_json_snapshot;
    use serde_json::{json, Map, Value};
    use std::collections::BTreeMap;

    #[derive(Default, Debug, PartialEq)]
    struct Block {
        name: String,
        label: Option<String>,
        enabled: bool,
        visible: Option<bool>,
        threads: Option<u64>,
        values: Vec<String>,
        urls: Vec<String>,
        config: BTreeMap<String, String>,
    }

    static BLOCK_FIELDS: &[FieldMapping<Block>] = &[
        FieldMapping::new(
            "name",
            "name",
            Presence::Always,
            Accessor::Str(|b| &b.name, |b| &mut b.name),
        ),
        FieldMapping::aliased(
            "label",
            "displayLabel",
            &["label"],
            Presence::NonEmpty,
            Accessor::OptStr(|b| &b.label, |b| &mut b.label),
        ),
        FieldMapping::new(
            "enabled",
            "enabled",
            Presence::NonEmpty,
            Accessor::Bool(|b| &b.enabled, |b| &mut b.enabled),
        ),
        FieldMapping::new(
            "visible",
            "visible",
            Presence::NonNull,
            Accessor::OptBool(|b| &b.visible, |b| &mut b.visible),
        ),
        FieldMapping::new(
            "threads",
            "threadcount",
            Presence::NonNull,
            Accessor::Int(|b| &b.threads, |b| &mut b.threads),
        ),
        FieldMapping::new(
            "values",
            "values",
            Presence::NonEmpty,
            Accessor::List(|b| &b.values, |b| &mut b.values, ListEncoding::Array),
        ),
        FieldMapping::new(
            "urls",
            "urls",
            Presence::NonEmpty,
            Accessor::List(|b| &b.urls, |b| &mut b.urls, ListEncoding::Joined),
        ),
        FieldMapping::new(
            "config",
            "configuration",
            Presence::NonEmpty,
            Accessor::Map(|b| &b.config, |b| &mut b.config),
        ),
    ];

    fn write(block: &Block, encoding: MapEncoding) -> Value {
        let mut wire = Map::new();
        write_fields(BLOCK_FIELDS, block, &mut wire, encoding);
        Value::Object(wire)
    }

    fn read(wire: Value) -> Result<Block, Error> {
        let mut block = Block::default();
        read_fields(
            BLOCK_FIELDS,
            wire.as_object().unwrap(),
            &mut block,
            &FieldPath::root("block"),
        )?;
        Ok(block)
    }

    #[test]
    fn emits_only_fields_that_satisfy_presence_rules() {
        assert_eq!(write(&Block::default(), MapEncoding::Json), json!({ "name": "" }));

        let block = Block {
            label: Some(String::new()),
            visible: Some(false),
            threads: Some(0),
            ..Default::default()
        };
        assert_eq!(
            write(&block, MapEncoding::Json),
            json!({ "name": "", "visible": false, "threadcount": 0 })
        );
    }

    #[test]
    fn writes_fields() {
        let block = Block {
            name: "deploy".to_string(),
            label: Some("Deploy".to_string()),
            enabled: true,
            visible: Some(true),
            threads: Some(4),
            values: vec!["a".to_string(), "b".to_string()],
            urls: vec!["https://a".to_string(), "https://b".to_string()],
            config: [("z".to_string(), "1".to_string()), ("a".to_string(), "2".to_string())]
                .into_iter()
                .collect(),
        };

        assert_json_snapshot!(write(&block, MapEncoding::Json), @r###"
        {
          "configuration": {
            "a": "2",
            "z": "1"
          },
          "displayLabel": "Deploy",
          "enabled": true,
          "name": "deploy",
          "threadcount": 4,
          "urls": "https://a,https://b",
          "values": [
            "a",
            "b"
          ],
          "visible": true
        }
        "###);

        assert_eq!(
            write(&block, MapEncoding::Xml)["configuration"],
            json!(r#"<configuration><entry key="a" value="2"/><entry key="z" value="1"/></configuration>"#)
        );
    }

    #[test]
    fn reads_fields() -> anyhow::Result<()> {
        let block = read(json!({
            "name": "deploy",
            "label": "Deploy",
            "enabled": "true",
            "visible": null,
            "threadcount": "4",
            "values": "a, b,,c",
            "urls": ["https://a", "https://b"],
            "configuration": { "port": 22, "secure": false }
        }))?;

        assert_eq!(
            block,
            Block {
                name: "deploy".to_string(),
                label: Some("Deploy".to_string()),
                enabled: true,
                visible: None,
                threads: Some(4),
                values: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                urls: vec!["https://a".to_string(), "https://b".to_string()],
                config: [
                    ("port".to_string(), "22".to_string()),
                    ("secure".to_string(), "false".to_string())
                ]
                .into_iter()
                .collect(),
            }
        );

        // Current wire name wins over the legacy one, empty strings of non-empty fields are unset.
        let block = read(json!({ "displayLabel": "", "label": "Legacy" }))?;
        assert_eq!(block.label, None);

        let block = read(json!({ "displayLabel": "Current", "label": "Legacy" }))?;
        assert_eq!(block.label.as_deref(), Some("Current"));

        Ok(())
    }

    #[test]
    fn fails_to_read_fields_of_unexpected_type() {
        let error = read(json!({ "name": { "first": "deploy" } })).unwrap_err();
        assert_eq!(
            error,
            Error::malformed("block.name", "expected a string, found an object.")
        );

        let error = read(json!({ "enabled": "yes" })).unwrap_err();
        assert_eq!(
            error.to_string(),
            "`block.enabled`: expected a boolean, found a string."
        );

        let error = read(json!({ "threadcount": -1 })).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedWireInput);

        let error = read(json!({ "values": ["a", ["b"]] })).unwrap_err();
        assert_eq!(error.path(), "block.values[1]");

        let error = read(json!({ "configuration": "<configuration><entry key=\"a\"/>" }))
            .unwrap_err();
        assert!(matches!(error, Error::MalformedMap { .. }));
        assert_eq!(error.path(), "block.configuration");
    }

    #[test]
    fn reads_string_lists() -> anyhow::Result<()> {
        let path = FieldPath::root("list");
        assert_eq!(read_string_list(&json!("a@b.c"), &path)?, vec!["a@b.c"]);
        assert!(read_string_list(&json!(""), &path)?.is_empty());
        assert_eq!(read_string_list(&json!([1, true]), &path)?, vec!["1", "true"]);

        Ok(())
    }

    #[test]
    fn trims_joined_list_items() -> anyhow::Result<()> {
        let block = Block {
            urls: vec![
                "https://a.example.com".to_string(),
                " https://b.example.com ".to_string(),
                "  ".to_string(),
            ],
            ..Default::default()
        };
        let wire = write(&block, MapEncoding::Json);
        assert_eq!(wire["urls"], json!("https://a.example.com,https://b.example.com"));
        assert_eq!(
            read(wire)?.urls,
            vec!["https://a.example.com", "https://b.example.com"]
        );

        let block = Block {
            urls: vec![" ".to_string()],
            ..Default::default()
        };
        assert_eq!(write(&block, MapEncoding::Json), json!({ "name": "" }));

        Ok(())
    }

    #[test]
    fn field_types() {
        assert_eq!(FieldType::String.to_string(), "a string");
        assert_eq!(FieldType::Int.to_string(), "a non-negative integer");
        assert_eq!(FieldType::StringList.to_string(), "a list of strings");
    }
}
