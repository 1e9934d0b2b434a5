use std::io::{self, BufRead, Write};

use bincode::Options;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Decoder, Encoder};
use crate::error::{CodecError, CodecResult};

/// Compact binary object encoding through `bincode`.
///
/// The format is not self-describing: a file must be read back into the same Rust type it
/// was written from. Files are decoded from memory, so a length prefix can never claim more
/// than the file holds, and trailing bytes are rejected.
#[derive(Debug, Default, Copy, Clone)]
pub struct PickleCodec;

impl<T: Serialize + ?Sized> Encoder<T> for PickleCodec {
    fn encode(&self, writer: &mut dyn Write, value: &T) -> CodecResult<()> {
        bincode::serialize_into(writer, value).map_err(|e| match *e {
            bincode::ErrorKind::Io(e) => CodecError::Io(e),
            kind => CodecError::Invalid(
                anyhow::Error::new(kind).context("object may not be serializable"),
            ),
        })
    }
}

impl<T: DeserializeOwned> Decoder<T> for PickleCodec {
    fn decode(&self, reader: &mut dyn BufRead) -> CodecResult<T> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .reject_trailing_bytes()
            .deserialize(&content)
            .map_err(|e| match *e {
                bincode::ErrorKind::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    CodecError::corrupt("unexpected end of file while reading pickle data")
                }
                bincode::ErrorKind::Io(e) => CodecError::Io(e),
                kind => CodecError::Corrupt(
                    anyhow::Error::new(kind).context("failed to unpickle the file"),
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        scores: Vec<u32>,
        tag: Option<char>,
    }

    #[test]
    fn test_round_trip() {
        let sample = Sample {
            name: "FastFS Unit Test".into(),
            scores: vec![1, 2, 3],
            tag: Some('x'),
        };
        let mut buf = Vec::new();
        PickleCodec.encode(&mut buf, &sample).unwrap();
        let decoded: Sample = PickleCodec.decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, sample);
    }

    #[test]
    fn test_truncated_is_corrupt() {
        let mut buf = Vec::new();
        PickleCodec
            .encode(&mut buf, &vec!["alpha".to_string(), "beta".to_string()])
            .unwrap();
        buf.truncate(buf.len() - 2);

        let result: CodecResult<Vec<String>> = PickleCodec.decode(&mut buf.as_slice());
        assert!(matches!(result, Err(CodecError::Corrupt(_))));
    }

    #[test]
    fn test_oversized_length_prefix_is_corrupt() {
        let content = br#"{"name": "not a pickle"}"#;
        let result: CodecResult<String> = PickleCodec.decode(&mut &content[..]);
        assert!(matches!(result, Err(CodecError::Corrupt(_))));
    }

    #[test]
    fn test_trailing_bytes_are_corrupt() {
        let mut buf = Vec::new();
        PickleCodec.encode(&mut buf, &7u32).unwrap();
        buf.push(0);

        let result: CodecResult<u32> = PickleCodec.decode(&mut buf.as_slice());
        assert!(matches!(result, Err(CodecError::Corrupt(_))));
    }

    #[test]
    fn test_empty_file_is_corrupt() {
        let result: CodecResult<Vec<u32>> = PickleCodec.decode(&mut &b""[..]);
        assert!(matches!(result, Err(CodecError::Corrupt(_))));
    }
}
