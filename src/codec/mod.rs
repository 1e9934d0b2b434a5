//! Format codecs.
//!
//! A codec is a stateless value that knows how to write one format into an open handle
//! (`Encoder`) and read it back (`Decoder`). Codecs never open or close files themselves:
//! the guarded executor hands them a handle and owns its lifetime.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::FsError;
use crate::core::Result;
use crate::error::CodecResult;

mod binary;
pub(crate) mod dynamic;
mod hdf5;
mod json;
mod pickle;
mod sectioned;
mod tabular;
mod text;
mod yaml;

pub use binary::BinaryCodec;
pub use hdf5::Hdf5Codec;
pub use json::JsonCodec;
pub use pickle::PickleCodec;
pub use sectioned::{IniCodec, IniData, Section};
pub use tabular::{CsvCodec, CsvData, CsvShape, Record};
pub use text::{LinesCodec, TextCodec};
pub use yaml::YamlCodec;

/// Writes values of type `T` into an open handle.
pub trait Encoder<T: ?Sized> {
    fn encode(&self, writer: &mut dyn Write, value: &T) -> CodecResult<()>;
}

/// Reads a value of type `T` from an open handle.
pub trait Decoder<T> {
    fn decode(&self, reader: &mut dyn BufRead) -> CodecResult<T>;
}

/// The closed set of formats the crate knows about.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FileType {
    Pickle,
    Json,
    Binary,
    Csv,
    Hdf5,
    Ini,
    Yaml,
}

impl FileType {
    pub const ALL: [FileType; 7] = [
        FileType::Pickle,
        FileType::Json,
        FileType::Binary,
        FileType::Csv,
        FileType::Hdf5,
        FileType::Ini,
        FileType::Yaml,
    ];

    /// Upper-case tag name.
    pub fn name(self) -> &'static str {
        match self {
            FileType::Pickle => "PICKLE",
            FileType::Json => "JSON",
            FileType::Binary => "BINARY",
            FileType::Csv => "CSV",
            FileType::Hdf5 => "HDF5",
            FileType::Ini => "INI",
            FileType::Yaml => "YAML",
        }
    }

    /// Every extension recognized on read. The first one is used for writing.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileType::Pickle => &["pkl", "pickle"],
            FileType::Json => &["json"],
            FileType::Binary => &["bin", "binary", "dat"],
            FileType::Csv => &["csv"],
            FileType::Hdf5 => &["hdf5", "h5"],
            FileType::Ini => &["ini"],
            FileType::Yaml => &["yaml", "yml"],
        }
    }

    /// Canonical extension used when writing.
    pub fn extension(self) -> &'static str {
        self.extensions()[0]
    }

    /// Looks a type up by file extension (without the dot, case-insensitive).
    pub fn from_extension(ext: &str) -> Option<FileType> {
        let ext = ext.to_ascii_lowercase();
        FileType::ALL
            .into_iter()
            .find(|t| t.extensions().contains(&ext.as_str()))
    }

    /// Name of the library backing this format when it is not linked into the build.
    pub fn missing_dependency(self) -> Option<&'static str> {
        match self {
            FileType::Hdf5 => Some(hdf5::LIBRARY),
            FileType::Yaml if !cfg!(feature = "yaml") => Some(yaml::LIBRARY),
            _ => None,
        }
    }

    pub fn is_available(self) -> bool {
        self.missing_dependency().is_none()
    }

    /// Fails with `MissingDependency` when the format cannot be used in this build.
    pub fn ensure_available(self) -> Result<()> {
        match self.missing_dependency() {
            Some(name) => Err(FsError::MissingDependency(name)),
            None => Ok(()),
        }
    }

    /// Comma separated list of every tag name.
    pub fn supported_names() -> String {
        FileType::ALL
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FileType {
    type Err = FsError;

    /// Case-insensitive tag name lookup (`"json"`, `"Json"` and `"JSON"` are the same).
    fn from_str(s: &str) -> Result<Self> {
        FileType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FsError::unsupported(s))
    }
}

/// Anything that names a `FileType`: the enum itself or its tag name.
pub trait AsFileType {
    fn as_file_type(&self) -> Result<FileType>;
}

impl AsFileType for FileType {
    fn as_file_type(&self) -> Result<FileType> {
        Ok(*self)
    }
}

impl AsFileType for &str {
    fn as_file_type(&self) -> Result<FileType> {
        self.parse()
    }
}

impl AsFileType for String {
    fn as_file_type(&self) -> Result<FileType> {
        self.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_a_canonical_extension() {
        for t in FileType::ALL {
            assert!(!t.extension().is_empty());
            assert_eq!(FileType::from_extension(t.extension()), Some(t));
        }
    }

    #[test]
    fn test_synonym_extensions() {
        assert_eq!(FileType::from_extension("pickle"), Some(FileType::Pickle));
        assert_eq!(FileType::from_extension("PKL"), Some(FileType::Pickle));
        assert_eq!(FileType::from_extension("yml"), Some(FileType::Yaml));
        assert_eq!(FileType::from_extension("dat"), Some(FileType::Binary));
        assert_eq!(FileType::from_extension("unknownext"), None);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("json".parse::<FileType>().unwrap(), FileType::Json);
        assert_eq!("Pickle".parse::<FileType>().unwrap(), FileType::Pickle);
        assert_eq!(" CSV ".parse::<FileType>().unwrap(), FileType::Csv);
    }

    #[test]
    fn test_parse_unknown_lists_supported() {
        let err = "parquet".parse::<FileType>().unwrap_err();
        match err {
            FsError::UnsupportedFileType {
                file_type,
                supported,
            } => {
                assert_eq!(file_type, "parquet");
                assert_eq!(supported, "PICKLE, JSON, BINARY, CSV, HDF5, INI, YAML");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_hdf5_is_never_available() {
        assert!(!FileType::Hdf5.is_available());
        assert!(matches!(
            FileType::Hdf5.ensure_available(),
            Err(FsError::MissingDependency("hdf5"))
        ));
        assert!(FileType::Json.ensure_available().is_ok());
    }
}
