use std::io::{BufRead, Write};

use serde_json::Value;

use super::{Decoder, Encoder};
use crate::error::{CodecError, CodecResult};

/// Raw bytes, written and read back verbatim.
#[derive(Debug, Default, Copy, Clone)]
pub struct BinaryCodec;

impl Encoder<[u8]> for BinaryCodec {
    fn encode(&self, writer: &mut dyn Write, value: &[u8]) -> CodecResult<()> {
        writer.write_all(value)?;
        Ok(())
    }
}

impl Encoder<Vec<u8>> for BinaryCodec {
    fn encode(&self, writer: &mut dyn Write, value: &Vec<u8>) -> CodecResult<()> {
        writer.write_all(value)?;
        Ok(())
    }
}

impl Decoder<Vec<u8>> for BinaryCodec {
    fn decode(&self, reader: &mut dyn BufRead) -> CodecResult<Vec<u8>> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        Ok(content)
    }
}

/// Accepts a byte array (`[0, 255, ...]`) or a string.
pub(crate) fn bytes_from_value(value: Value) -> CodecResult<Vec<u8>> {
    match value {
        Value::String(s) => Ok(s.into_bytes()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or_else(|| CodecError::invalid("data should be bytes for writing binary"))
            })
            .collect(),
        _ => Err(CodecError::invalid("data should be bytes for writing binary")),
    }
}

pub(crate) fn bytes_to_value(bytes: Vec<u8>) -> Value {
    Value::Array(bytes.into_iter().map(Value::from).collect())
}
