use std::collections::HashSet;
use std::io::{BufRead, Write};

use indexmap::IndexMap;
use ini::{Ini, ParseOption};
use serde_json::{Map, Value};

use super::text::TextCodec;
use super::{Decoder, Encoder};
use crate::error::{CodecError, CodecResult};

/// Options of one section, in file order.
pub type Section = IndexMap<String, String>;

/// Name of the implicit section flat data is written under.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Key/value-sectioned data.
#[derive(Debug, Clone, PartialEq)]
pub enum IniData {
    /// Options of the default section only.
    Flat(Section),
    /// One entry per section.
    Sections(IndexMap<String, Section>),
}

impl IniData {
    /// Looks an option up in the default section (flat form) or in `section`.
    pub fn get(&self, section: Option<&str>, key: &str) -> Option<&str> {
        let options = match (self, section) {
            (IniData::Flat(options), None) => options,
            (IniData::Flat(options), Some(DEFAULT_SECTION)) => options,
            (IniData::Sections(sections), name) => sections.get(name.unwrap_or(DEFAULT_SECTION))?,
            _ => return None,
        };
        options
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// INI files through `rust-ini`.
///
/// Option names are compared case-insensitively when checking for duplicates, the way
/// classic config parsers fold them.
#[derive(Debug, Default, Copy, Clone)]
pub struct IniCodec;

impl Encoder<IniData> for IniCodec {
    fn encode(&self, writer: &mut dyn Write, value: &IniData) -> CodecResult<()> {
        let mut ini = Ini::new();
        match value {
            IniData::Flat(options) => add_section(&mut ini, DEFAULT_SECTION, options)?,
            IniData::Sections(sections) => {
                for (name, options) in sections {
                    add_section(&mut ini, name, options)?;
                }
            }
        }

        let mut buf = Vec::new();
        ini.write_to(&mut buf)?;
        writer.write_all(&buf)?;
        Ok(())
    }
}

impl Decoder<IniData> for IniCodec {
    fn decode(&self, reader: &mut dyn BufRead) -> CodecResult<IniData> {
        let content = TextCodec.decode(reader)?;
        // values are written unquoted; quotes read back belong to the value
        let options = ParseOption {
            enabled_quote: false,
            ..Default::default()
        };
        let ini = Ini::load_from_str_opt(&content, options).map_err(|e| {
            CodecError::Corrupt(anyhow::Error::new(e).context("the file could not be parsed"))
        })?;

        let mut sections: IndexMap<String, Section> = IndexMap::new();
        let mut seen_sections = HashSet::new();
        for (name, properties) in ini.iter() {
            if name.is_none() && properties.is_empty() {
                continue;
            }
            let name = name.unwrap_or(DEFAULT_SECTION);
            if name != DEFAULT_SECTION && !seen_sections.insert(name.to_string()) {
                return Err(CodecError::corrupt(format!(
                    "duplicate section '{name}' found in the file"
                )));
            }

            let section = sections.entry(name.to_string()).or_default();
            for (key, value) in properties.iter() {
                if contains_option(section, key) {
                    return Err(CodecError::corrupt(format!(
                        "duplicate option '{key}' in section '{name}' found in the file"
                    )));
                }
                section.insert(key.to_string(), value.to_string());
            }
        }

        if sections.keys().all(|name| name == DEFAULT_SECTION) {
            let options = sections.swap_remove(DEFAULT_SECTION).unwrap_or_default();
            return Ok(IniData::Flat(options));
        }
        Ok(IniData::Sections(sections))
    }
}

fn add_section(ini: &mut Ini, name: &str, options: &Section) -> CodecResult<()> {
    if name.is_empty() || name.contains(['[', ']', '\n', '\r']) {
        return Err(CodecError::invalid(format!(
            "'{name}' cannot be used as a section name"
        )));
    }

    let mut seen = Section::new();
    for (key, value) in options {
        if key.trim().is_empty()
            || key.trim() != key
            || key.contains(['=', ':', '\n', '\r'])
            || key.starts_with(['[', ';', '#'])
        {
            return Err(CodecError::invalid(format!(
                "'{key}' cannot be used as an option name"
            )));
        }
        if value.contains(['\n', '\r']) {
            return Err(CodecError::invalid(format!(
                "the value of option '{key}' spans several lines"
            )));
        }
        if contains_option(&seen, key) {
            return Err(CodecError::invalid(format!(
                "duplicate option '{key}' in section '{name}'"
            )));
        }
        seen.insert(key.clone(), value.clone());
        ini.set_to(Some(name), key.clone(), value.clone());
    }
    Ok(())
}

fn contains_option(section: &Section, key: &str) -> bool {
    section.keys().any(|k| k.eq_ignore_ascii_case(key))
}

/// Accepts a flat mapping of scalars or a mapping of such mappings.
pub(crate) fn data_from_value(value: Value) -> CodecResult<IniData> {
    const SHAPE: &str = "for INI files, keys are section names and values are mappings of the \
                         options present in the section";

    let Value::Object(root) = value else {
        return Err(CodecError::invalid(SHAPE));
    };

    if root.values().all(|v| !v.is_object()) {
        return Ok(IniData::Flat(section_from_map(root)?));
    }
    if !root.values().all(Value::is_object) {
        return Err(CodecError::invalid(SHAPE));
    }

    let mut sections = IndexMap::new();
    for (name, options) in root {
        let Value::Object(options) = options else {
            return Err(CodecError::invalid(SHAPE));
        };
        sections.insert(name, section_from_map(options)?);
    }
    Ok(IniData::Sections(sections))
}

fn section_from_map(map: Map<String, Value>) -> CodecResult<Section> {
    map.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                _ => {
                    return Err(CodecError::invalid(format!(
                        "the value of option '{key}' is not a scalar"
                    )));
                }
            };
            Ok((key, value))
        })
        .collect()
}

pub(crate) fn data_to_value(data: IniData) -> Value {
    fn section_to_value(section: Section) -> Value {
        Value::Object(
            section
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        )
    }

    match data {
        IniData::Flat(options) => section_to_value(options),
        IniData::Sections(sections) => Value::Object(
            sections
                .into_iter()
                .map(|(name, options)| (name, section_to_value(options)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn section(pairs: &[(&str, &str)]) -> Section {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn encode(data: &IniData) -> CodecResult<Vec<u8>> {
        let mut buf = Vec::new();
        IniCodec.encode(&mut buf, data)?;
        Ok(buf)
    }

    #[test]
    fn test_flat_round_trip() {
        let data = IniData::Flat(section(&[("directory", "files"), ("active", "true")]));
        let buf = encode(&data).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.contains("[DEFAULT]"));
        assert!(text.contains("directory=files"));

        let decoded = IniCodec.decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(decoded.get(None, "Directory"), Some("files"));
    }

    #[test]
    fn test_sections_round_trip() {
        let mut sections = IndexMap::new();
        sections.insert("server".to_string(), section(&[("host", "localhost"), ("port", "8080")]));
        sections.insert("client".to_string(), section(&[("retries", "3")]));
        let data = IniData::Sections(sections);

        let buf = encode(&data).unwrap();
        let decoded = IniCodec.decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(decoded.get(Some("server"), "port"), Some("8080"));
        assert_eq!(decoded.get(Some("missing"), "port"), None);
    }

    #[test]
    fn test_special_characters_round_trip() {
        let data = IniData::Flat(section(&[
            ("url", "a;b#c"),
            ("quoted", "\"x\""),
            ("single", "'y'"),
            ("path", "C:\\dir"),
        ]));
        let buf = encode(&data).unwrap();
        let decoded = IniCodec.decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_headerless_options_read_as_flat() {
        let content = b"directory = files\nactive = yes\n";
        let decoded = IniCodec.decode(&mut &content[..]).unwrap();
        assert_eq!(
            decoded,
            IniData::Flat(section(&[("directory", "files"), ("active", "yes")]))
        );
    }

    #[test]
    fn test_duplicate_option_is_invalid() {
        let data = IniData::Flat(section(&[("Key", "1"), ("key", "2")]));
        assert!(matches!(encode(&data), Err(CodecError::Invalid(_))));
    }

    #[test]
    fn test_duplicate_option_in_file_is_corrupt() {
        let content = b"[a]\nX=1\nx=2\n";
        let result = IniCodec.decode(&mut &content[..]);
        assert!(matches!(result, Err(CodecError::Corrupt(_))));
    }

    #[test]
    fn test_unrepresentable_names_are_invalid() {
        let data = IniData::Flat(section(&[("a=b", "1")]));
        assert!(matches!(encode(&data), Err(CodecError::Invalid(_))));

        let mut sections = IndexMap::new();
        sections.insert("bad]name".to_string(), section(&[("a", "1")]));
        assert!(matches!(
            encode(&IniData::Sections(sections)),
            Err(CodecError::Invalid(_))
        ));

        let data = IniData::Flat(section(&[("a", "line\nbreak")]));
        assert!(matches!(encode(&data), Err(CodecError::Invalid(_))));
    }

    #[test]
    fn test_value_bridge() {
        let flat = data_from_value(json!({"directory": "files", "active": true, "depth": 2}))
            .unwrap();
        assert_eq!(
            flat,
            IniData::Flat(section(&[
                ("directory", "files"),
                ("active", "true"),
                ("depth", "2")
            ]))
        );

        let nested = data_from_value(json!({"server": {"port": 8080}})).unwrap();
        assert_eq!(data_to_value(nested), json!({"server": {"port": "8080"}}));

        assert!(matches!(
            data_from_value(json!([1, 2])),
            Err(CodecError::Invalid(_))
        ));
        assert!(matches!(
            data_from_value(json!({"a": 1, "b": {"c": 2}})),
            Err(CodecError::Invalid(_))
        ));
        assert!(matches!(
            data_from_value(json!({"a": [1]})),
            Err(CodecError::Invalid(_))
        ));
    }
}
