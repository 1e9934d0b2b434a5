//! Format selection at runtime.
//!
//! Self-describing formats go straight through their codec. Binary, CSV and INI only
//! carry bytes, tables and string maps, so arbitrary serde values pass through a
//! `serde_json::Value` bridge first.

use std::io::{BufRead, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{
    BinaryCodec, CsvCodec, CsvShape, Decoder, Encoder, FileType, Hdf5Codec, IniCodec, JsonCodec,
    PickleCodec, YamlCodec, binary, sectioned, tabular,
};
use crate::error::{CodecError, CodecResult};

pub(crate) fn encode_serde<T: Serialize + ?Sized>(
    file_type: FileType,
    writer: &mut dyn Write,
    value: &T,
) -> CodecResult<()> {
    match file_type {
        FileType::Pickle => PickleCodec.encode(writer, value),
        FileType::Json => JsonCodec.encode(writer, value),
        FileType::Yaml => YamlCodec.encode(writer, value),
        FileType::Hdf5 => Hdf5Codec.encode(writer, value),
        FileType::Binary => {
            let bytes = binary::bytes_from_value(to_value(value)?)?;
            BinaryCodec.encode(writer, bytes.as_slice())
        }
        FileType::Csv => {
            let data = tabular::data_from_value(to_value(value)?)?;
            CsvCodec::default().encode(writer, &data)
        }
        FileType::Ini => {
            let data = sectioned::data_from_value(to_value(value)?)?;
            IniCodec.encode(writer, &data)
        }
    }
}

pub(crate) fn decode_serde<T: DeserializeOwned>(
    file_type: FileType,
    reader: &mut dyn BufRead,
) -> CodecResult<T> {
    match file_type {
        FileType::Pickle => PickleCodec.decode(reader),
        FileType::Json => JsonCodec.decode(reader),
        FileType::Yaml => YamlCodec.decode(reader),
        FileType::Hdf5 => Hdf5Codec.decode(reader),
        FileType::Binary => {
            let bytes: Vec<u8> = BinaryCodec.decode(reader)?;
            from_value(binary::bytes_to_value(bytes))
        }
        FileType::Csv => {
            let data = CsvCodec::new(CsvShape::Records).decode(reader)?;
            from_value(tabular::data_to_value(data))
        }
        FileType::Ini => {
            let data = IniCodec.decode(reader)?;
            from_value(sectioned::data_to_value(data))
        }
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> CodecResult<Value> {
    serde_json::to_value(value).map_err(|e| {
        CodecError::Invalid(anyhow::Error::new(e).context("failed to serialize the data"))
    })
}

fn from_value<T: DeserializeOwned>(value: Value) -> CodecResult<T> {
    serde_json::from_value(value).map_err(|e| {
        CodecError::Corrupt(
            anyhow::Error::new(e).context("the content does not match the requested type"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Person {
        #[serde(rename = "Name")]
        name: String,
        #[serde(rename = "Age")]
        age: String,
    }

    fn round_trip<T>(file_type: FileType, value: &T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        let mut buf = Vec::new();
        encode_serde(file_type, &mut buf, value).unwrap();
        decode_serde(file_type, &mut buf.as_slice()).unwrap()
    }

    #[test]
    fn test_binary_bytes() {
        let bytes = b"\x00binary\xff".to_vec();
        assert_eq!(round_trip(FileType::Binary, &bytes), bytes);
    }

    #[test]
    fn test_csv_records() {
        let people = vec![
            Person {
                name: "Alice".into(),
                age: "30".into(),
            },
            Person {
                name: "Bob".into(),
                age: "25".into(),
            },
        ];
        assert_eq!(round_trip(FileType::Csv, &people), people);
    }

    #[test]
    fn test_ini_sections() {
        let mut sections: IndexMap<String, IndexMap<String, String>> = IndexMap::new();
        sections
            .entry("server".into())
            .or_default()
            .insert("port".into(), "8080".into());
        assert_eq!(round_trip(FileType::Ini, &sections), sections);
    }

    #[test]
    fn test_self_describing_formats() {
        let value = vec!["a".to_string(), "b".to_string()];
        assert_eq!(round_trip(FileType::Json, &value), value);
        assert_eq!(round_trip(FileType::Pickle, &value), value);
    }

    #[test]
    fn test_hdf5_is_missing() {
        let mut buf = Vec::new();
        let result = encode_serde(FileType::Hdf5, &mut buf, &1);
        assert!(matches!(result, Err(CodecError::MissingDependency("hdf5"))));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_binary_rejects_maps() {
        let mut data = IndexMap::new();
        data.insert("a", 1);
        let mut buf = Vec::new();
        let result = encode_serde(FileType::Binary, &mut buf, &data);
        assert!(matches!(result, Err(CodecError::Invalid(_))));
    }
}
