use std::io::{BufRead, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Decoder, Encoder};
use crate::error::{CodecError, CodecResult};

/// JSON through `serde_json`.
#[derive(Debug, Default, Copy, Clone)]
pub struct JsonCodec;

impl<T: Serialize + ?Sized> Encoder<T> for JsonCodec {
    fn encode(&self, writer: &mut dyn Write, value: &T) -> CodecResult<()> {
        serde_json::to_writer(writer, value).map_err(|e| {
            if e.is_io() {
                CodecError::Io(e.into())
            } else {
                CodecError::Invalid(anyhow::Error::new(e).context("failed to serialize the data"))
            }
        })
    }
}

impl<T: DeserializeOwned> Decoder<T> for JsonCodec {
    fn decode(&self, reader: &mut dyn BufRead) -> CodecResult<T> {
        serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                CodecError::Io(e.into())
            } else {
                CodecError::Corrupt(anyhow::Error::new(e).context("could not decode JSON"))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_round_trip() {
        let mut data = HashMap::new();
        data.insert("test".to_string(), "FastFS Unit Test".to_string());

        let mut buf = Vec::new();
        JsonCodec.encode(&mut buf, &data).unwrap();
        let decoded: HashMap<String, String> = JsonCodec.decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_non_string_keys_are_invalid() {
        let mut data = BTreeMap::new();
        data.insert(vec![1, 2], "tuple key");

        let mut buf = Vec::new();
        let result = JsonCodec.encode(&mut buf, &data);
        assert!(matches!(result, Err(CodecError::Invalid(_))));
    }

    #[test]
    fn test_truncated_input_is_corrupt() {
        let content = br#"{"test": "Fast"#;
        let result: CodecResult<serde_json::Value> = JsonCodec.decode(&mut &content[..]);
        assert!(matches!(result, Err(CodecError::Corrupt(_))));
    }
}
