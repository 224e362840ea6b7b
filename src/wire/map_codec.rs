use crate::config::MapEncoding;
use itertools::Itertools;
use quick_xml::{
    escape::escape,
    events::{BytesStart, Event},
    Reader,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

/// Names of the elements and attributes of a map encoded as a list of tagged XML entries, e.g.
/// `<configuration><entry key="port" value="22"/></configuration>`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct XmlMapShape {
    pub container: &'static str,
    pub entry: &'static str,
    pub key_attribute: &'static str,
    pub value_attribute: &'static str,
}

impl XmlMapShape {
    /// Shape of the plugin configuration maps.
    pub const PLUGIN_CONFIGURATION: XmlMapShape = XmlMapShape {
        container: "configuration",
        entry: "entry",
        key_attribute: "key",
        value_attribute: "value",
    };
}

/// Error returned when a tagged-entry map can't be decoded.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum MalformedMapError {
    #[error("stream ended before the closing `{expected}` marker.")]
    UnexpectedEnd { expected: String },
    #[error("unexpected element `{found}`, expected `{expected}`.")]
    UnexpectedElement { found: String, expected: String },
    #[error("`<{entry}>` element is missing the `{attribute}` attribute.")]
    MissingKey { entry: String, attribute: String },
    #[error("value of the `{key}` entry is neither a string nor a scalar.")]
    UnsupportedValue { key: String },
    #[error("invalid XML: {0}")]
    Syntax(String),
}

/// Encodes map into a JSON object. Keys of `serde_json` objects are kept sorted, so the same map
/// always produces the same byte sequence.
pub fn encode_json_map(map: &BTreeMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect(),
    )
}

/// Decodes map from a JSON object. Numbers and booleans are converted to strings, `null` values
/// are ignored.
pub fn decode_json_map(
    object: &Map<String, Value>,
) -> Result<BTreeMap<String, String>, MalformedMapError> {
    let mut map = BTreeMap::new();
    for (key, value) in object {
        let value = match value {
            Value::Null => continue,
            Value::String(value) => value.clone(),
            Value::Bool(value) => value.to_string(),
            Value::Number(value) => value.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(MalformedMapError::UnsupportedValue { key: key.clone() })
            }
        };
        map.insert(key.clone(), value);
    }

    Ok(map)
}

/// Encodes map into a list of tagged XML entries sorted by key.
pub fn encode_xml_map(map: &BTreeMap<String, String>, shape: &XmlMapShape) -> String {
    if map.is_empty() {
        return format!("<{}/>", shape.container);
    }

    let entries = map
        .iter()
        .map(|(key, value)| {
            format!(
                r#"<{} {}="{}" {}="{}"/>"#,
                shape.entry,
                shape.key_attribute,
                escape(key.as_str()),
                shape.value_attribute,
                escape(value.as_str())
            )
        })
        .join("");
    format!("<{0}>{entries}</{0}>", shape.container)
}

/// Decodes map from a list of tagged XML entries. Entries don't need to be sorted, the last entry
/// wins if a key is repeated. Entries without the value attribute map to an empty string.
pub fn decode_xml_map(
    xml: &str,
    shape: &XmlMapShape,
) -> Result<BTreeMap<String, String>, MalformedMapError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event().map_err(syntax_error)? {
            Event::Start(element) if element.name().as_ref() == shape.container.as_bytes() => {
                break;
            }
            Event::Empty(element) if element.name().as_ref() == shape.container.as_bytes() => {
                return Ok(BTreeMap::new());
            }
            Event::Start(element) | Event::Empty(element) => {
                return Err(MalformedMapError::UnexpectedElement {
                    found: element_name(&element),
                    expected: shape.container.to_string(),
                });
            }
            Event::Eof => {
                return Err(MalformedMapError::UnexpectedEnd {
                    expected: format!("</{}>", shape.container),
                })
            }
            _ => {}
        }
    }

    let mut map = BTreeMap::new();
    loop {
        match reader.read_event().map_err(syntax_error)? {
            Event::Empty(element) if element.name().as_ref() == shape.entry.as_bytes() => {
                let (key, value) = read_entry(&element, shape)?;
                map.insert(key, value);
            }
            Event::Start(element) if element.name().as_ref() == shape.entry.as_bytes() => {
                let (key, value) = read_entry(&element, shape)?;
                map.insert(key, value);
                skip_to_entry_end(&mut reader, shape)?;
            }
            Event::End(element) if element.name().as_ref() == shape.container.as_bytes() => {
                return Ok(map);
            }
            Event::Start(element) | Event::Empty(element) => {
                return Err(MalformedMapError::UnexpectedElement {
                    found: element_name(&element),
                    expected: shape.entry.to_string(),
                });
            }
            Event::Eof => {
                return Err(MalformedMapError::UnexpectedEnd {
                    expected: format!("</{}>", shape.container),
                })
            }
            _ => {}
        }
    }
}

/// Encodes map with the specified encoding.
pub(crate) fn encode_map(map: &BTreeMap<String, String>, encoding: MapEncoding) -> Value {
    match encoding {
        MapEncoding::Json => encode_json_map(map),
        MapEncoding::Xml => Value::String(encode_xml_map(map, &XmlMapShape::PLUGIN_CONFIGURATION)),
    }
}

/// Decodes map from either a JSON object or a string with tagged XML entries.
pub(crate) fn decode_map(value: &Value) -> Result<BTreeMap<String, String>, MalformedMapError> {
    match value {
        Value::Null => Ok(BTreeMap::new()),
        Value::Object(object) => decode_json_map(object),
        Value::String(xml) => decode_xml_map(xml, &XmlMapShape::PLUGIN_CONFIGURATION),
        _ => Err(MalformedMapError::Syntax(
            "expected either an object or an XML string.".to_string(),
        )),
    }
}

fn read_entry(
    element: &BytesStart,
    shape: &XmlMapShape,
) -> Result<(String, String), MalformedMapError> {
    let mut key = None;
    let mut value = None;
    for attribute in element.attributes() {
        let attribute = attribute.map_err(syntax_error)?;
        let attribute_key = attribute.key.as_ref();
        if attribute_key == shape.key_attribute.as_bytes() {
            key = Some(attribute.unescape_value().map_err(syntax_error)?.into_owned());
        } else if attribute_key == shape.value_attribute.as_bytes() {
            value = Some(attribute.unescape_value().map_err(syntax_error)?.into_owned());
        }
    }

    let key = key.ok_or_else(|| MalformedMapError::MissingKey {
        entry: shape.entry.to_string(),
        attribute: shape.key_attribute.to_string(),
    })?;
    Ok((key, value.unwrap_or_default()))
}

fn skip_to_entry_end(reader: &mut Reader<&[u8]>, shape: &XmlMapShape) -> Result<(), MalformedMapError> {
    loop {
        match reader.read_event().map_err(syntax_error)? {
            Event::End(element) if element.name().as_ref() == shape.entry.as_bytes() => {
                return Ok(());
            }
            Event::Start(element) | Event::Empty(element) => {
                return Err(MalformedMapError::UnexpectedElement {
                    found: element_name(&element),
                    expected: format!("/{}", shape.entry),
                });
            }
            Event::Eof => {
                return Err(MalformedMapError::UnexpectedEnd {
                    expected: format!("</{}>", shape.entry),
                })
            }
            _ => {}
        }
    }
}

fn element_name(element: &BytesStart) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

fn syntax_error<E: std::fmt::Display>(err: E) -> MalformedMapError {
    MalformedMapError::Syntax(err.to_string())
}
