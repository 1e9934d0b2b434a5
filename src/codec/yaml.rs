use std::io::{BufRead, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Decoder, Encoder};
use crate::error::{CodecError, CodecResult};

pub(crate) const LIBRARY: &str = "serde_yaml";

/// YAML through `serde_yaml`, available with the `yaml` feature.
#[derive(Debug, Default, Copy, Clone)]
pub struct YamlCodec;

#[cfg(feature = "yaml")]
impl<T: Serialize + ?Sized> Encoder<T> for YamlCodec {
    fn encode(&self, writer: &mut dyn Write, value: &T) -> CodecResult<()> {
        let document = serde_yaml::to_string(value).map_err(|e| {
            CodecError::Invalid(anyhow::Error::new(e).context("failed to serialize the data"))
        })?;
        writer.write_all(document.as_bytes())?;
        Ok(())
    }
}

#[cfg(feature = "yaml")]
impl<T: DeserializeOwned> Decoder<T> for YamlCodec {
    fn decode(&self, reader: &mut dyn BufRead) -> CodecResult<T> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        serde_yaml::from_slice(&content).map_err(|e| {
            CodecError::Corrupt(anyhow::Error::new(e).context("could not decode YAML"))
        })
    }
}

#[cfg(not(feature = "yaml"))]
impl<T: Serialize + ?Sized> Encoder<T> for YamlCodec {
    fn encode(&self, _writer: &mut dyn Write, _value: &T) -> CodecResult<()> {
        Err(CodecError::MissingDependency(LIBRARY))
    }
}

#[cfg(not(feature = "yaml"))]
impl<T: DeserializeOwned> Decoder<T> for YamlCodec {
    fn decode(&self, _reader: &mut dyn BufRead) -> CodecResult<T> {
        Err(CodecError::MissingDependency(LIBRARY))
    }
}

#[cfg(all(test, feature = "yaml"))]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_round_trip() {
        let mut data = BTreeMap::new();
        data.insert("name".to_string(), vec![1, 2, 3]);

        let mut buf = Vec::new();
        YamlCodec.encode(&mut buf, &data).unwrap();
        let decoded: BTreeMap<String, Vec<i32>> = YamlCodec.decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_malformed_is_corrupt() {
        let content = b"key: [unclosed";
        let result: CodecResult<serde_yaml::Value> = YamlCodec.decode(&mut &content[..]);
        assert!(matches!(result, Err(CodecError::Corrupt(_))));
    }
}
