use std::io::{BufRead, Write};

use anyhow::Context;

use super::{Decoder, Encoder};
use crate::error::{CodecError, CodecResult};

/// Whole-file UTF-8 text.
#[derive(Debug, Default, Copy, Clone)]
pub struct TextCodec;

impl Encoder<str> for TextCodec {
    fn encode(&self, writer: &mut dyn Write, value: &str) -> CodecResult<()> {
        writer.write_all(value.as_bytes())?;
        Ok(())
    }
}

impl Decoder<String> for TextCodec {
    fn decode(&self, reader: &mut dyn BufRead) -> CodecResult<String> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        String::from_utf8(content)
            .context("the file is not valid UTF-8 text")
            .map_err(CodecError::Corrupt)
    }
}

/// One entry per line. Decoding trims surrounding whitespace of every line.
#[derive(Debug, Default, Copy, Clone)]
pub struct LinesCodec;

impl<S: AsRef<str>> Encoder<[S]> for LinesCodec {
    fn encode(&self, writer: &mut dyn Write, value: &[S]) -> CodecResult<()> {
        for line in value {
            writer.write_all(line.as_ref().as_bytes())?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}

impl Decoder<Vec<String>> for LinesCodec {
    fn decode(&self, reader: &mut dyn BufRead) -> CodecResult<Vec<String>> {
        let content = TextCodec.decode(reader)?;
        Ok(content.lines().map(|line| line.trim().to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_round_trip() {
        let mut buf = Vec::new();
        TextCodec.encode(&mut buf, "Hello, мир!").unwrap();
        let decoded: String = TextCodec.decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, "Hello, мир!");
    }

    #[test]
    fn test_text_invalid_utf8_is_corrupt() {
        let bytes: &[u8] = &[0x66, 0xff, 0xfe];
        let result: CodecResult<String> = TextCodec.decode(&mut &bytes[..]);
        assert!(matches!(result, Err(CodecError::Corrupt(_))));
    }

    #[test]
    fn test_lines_round_trip() {
        let lines = ["Line 1", "Line 2", "Line 3"];
        let mut buf = Vec::new();
        LinesCodec.encode(&mut buf, &lines[..]).unwrap();
        assert_eq!(buf, b"Line 1\nLine 2\nLine 3\n");

        let decoded: Vec<String> = LinesCodec.decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, lines);
    }

    #[test]
    fn test_lines_trim_and_crlf() {
        let content = b"  first \r\nsecond\r\n";
        let decoded: Vec<String> = LinesCodec.decode(&mut &content[..]).unwrap();
        assert_eq!(decoded, vec!["first", "second"]);
    }
}
