mod conversion;
mod converters;
mod document;
mod field_mapper;
mod field_path;
mod map_codec;

pub(crate) use self::conversion::{ConversionContext, Direction};
pub use self::{
    conversion::{Conversion, Diagnostic},
    document::DocumentAssembler,
    field_path::FieldPath,
    map_codec::{
        decode_json_map, decode_xml_map, encode_json_map, encode_xml_map, MalformedMapError,
        XmlMapShape,
    },
};

/// Job document in the format accepted and returned by the remote scheduler API.
pub type WireDocument = serde_json::Value;
