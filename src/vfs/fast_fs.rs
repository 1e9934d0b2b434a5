//! The `FastFS` facade.
//!
//! Every operation composes the same three steps: the virtual root rewrites the logical path,
//! the guarded executor opens and releases the handle, and a codec does the format work.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::FsError;
use crate::codec::dynamic::{decode_serde, encode_serde};
use crate::codec::{
    AsFileType, BinaryCodec, CsvCodec, CsvData, CsvShape, Decoder, Encoder, FileType, IniCodec,
    IniData, JsonCodec, LinesCodec, PickleCodec, Record, TextCodec, YamlCodec,
};
use crate::core::{PathResolver, Result};
use crate::vfs::guarded::{LineStream, WriteMode, read_guarded, write_guarded};
use crate::vfs::root::VirtualRoot;

/// Format-aware file access with transparent virtual root redirection.
///
/// ### Example:
/// ```no_run
/// use fastfs_kit::FastFS;
///
/// let mut fs = FastFS::new();
/// fs.initialize("files", true).unwrap();
///
/// // lands in ./files/greeting.json
/// fs.write_json("greeting.json", &vec!["hello", "world"]).unwrap();
/// let back: Vec<String> = fs.read_json("greeting.json").unwrap();
/// assert_eq!(back, ["hello", "world"]);
/// ```
#[derive(Debug, Default)]
pub struct FastFS {
    root: VirtualRoot,
}

impl FastFS {
    /// A facade anchored at the process working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// A facade anchored at `workdir`, which must be an existing directory. The
    /// configuration file and every relative path are interpreted against it.
    pub fn with_workdir<P: AsRef<Path>>(workdir: P) -> Result<Self> {
        let workdir = workdir.as_ref();
        if !workdir.is_dir() {
            return Err(FsError::directory_not_found(workdir));
        }
        Ok(Self {
            root: VirtualRoot::new(workdir),
        })
    }

    pub fn workdir(&self) -> &Path {
        self.root.workdir()
    }

    /// Creates `directory` if missing and makes it the virtual root.
    ///
    /// With `active == false` the configuration is persisted but paths are not redirected.
    pub fn initialize<P: AsRef<Path>>(&mut self, directory: P, active: bool) -> Result<()> {
        self.root.initialize(directory, active)
    }

    /// Configured virtual root, or `None` when no configuration file exists.
    pub fn current_root(&self, absolute: bool) -> Option<PathBuf> {
        self.root.current_root(absolute)
    }

    /// Drops the cached configuration so that it is read again on the next call.
    pub fn reset(&mut self) {
        self.root.reset()
    }

    /// The path that is actually opened for the logical `path`.
    pub fn to_host<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        self.root.to_host(path)
    }

    /// Resolves `path`, then encodes `value` into it with `codec`.
    pub fn write_with<P, T, C>(&self, path: P, mode: WriteMode, codec: &C, value: &T) -> Result<()>
    where
        P: AsRef<Path>,
        T: ?Sized,
        C: Encoder<T>,
    {
        let host = self.to_host(path)?;
        write_guarded(&host, mode, |w| codec.encode(w, value))
    }

    /// Resolves `path`, then decodes its content with `codec`.
    pub fn read_with<P, T, C>(&self, path: P, codec: &C) -> Result<T>
    where
        P: AsRef<Path>,
        C: Decoder<T>,
    {
        let host = self.to_host(path)?;
        read_guarded(&host, |r| codec.decode(r))
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P, content: &str) -> Result<()> {
        self.write_with(path, WriteMode::Truncate, &TextCodec, content)
    }

    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        self.read_with(path, &TextCodec)
    }

    /// Writes one line per entry, each terminated by `\n`.
    pub fn write_lines<P, S>(&self, path: P, lines: &[S]) -> Result<()>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        self.write_with(path, WriteMode::Truncate, &LinesCodec, lines)
    }

    pub fn append_lines<P, S>(&self, path: P, lines: &[S]) -> Result<()>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        self.write_with(path, WriteMode::Append, &LinesCodec, lines)
    }

    /// Every line of the file, trimmed.
    pub fn read_lines<P: AsRef<Path>>(&self, path: P) -> Result<Vec<String>> {
        self.read_with(path, &LinesCodec)
    }

    /// Streams the lines of the file.
    ///
    /// The returned stream owns an open handle until it is exhausted, closed or dropped.
    pub fn iter_lines<P: AsRef<Path>>(&self, path: P) -> Result<LineStream> {
        LineStream::open(&self.to_host(path)?)
    }

    pub fn write_binary<P: AsRef<Path>>(&self, path: P, data: &[u8]) -> Result<()> {
        self.write_with(path, WriteMode::Truncate, &BinaryCodec, data)
    }

    pub fn read_binary<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>> {
        self.read_with(path, &BinaryCodec)
    }

    pub fn write_json<P, T>(&self, path: P, value: &T) -> Result<()>
    where
        P: AsRef<Path>,
        T: Serialize + ?Sized,
    {
        self.write_with(path, WriteMode::Truncate, &JsonCodec, value)
    }

    pub fn read_json<P: AsRef<Path>, T: DeserializeOwned>(&self, path: P) -> Result<T> {
        self.read_with(path, &JsonCodec)
    }

    /// Appends `item` to the JSON array stored at `path`, creating the file when absent.
    ///
    /// Fails with `InvalidData` when the file holds something other than an array.
    pub fn append_json<P, T>(&self, path: P, item: &T) -> Result<()>
    where
        P: AsRef<Path>,
        T: Serialize + ?Sized,
    {
        let host = self.to_host(path)?;
        let mut items = match read_guarded(&host, |r| JsonCodec.decode(r)) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                return Err(FsError::invalid_data(format!(
                    "{} does not contain a JSON list",
                    host.display()
                )));
            }
            Err(FsError::NotFound { .. }) => Vec::new(),
            Err(e) => return Err(e),
        };
        let item = serde_json::to_value(item).map_err(|e| {
            FsError::InvalidData(anyhow::Error::new(e).context("failed to serialize the data"))
        })?;
        items.push(item);

        write_guarded(&host, WriteMode::Truncate, |w| {
            JsonCodec.encode(w, &Value::Array(items))
        })
    }

    /// Writes `value` in the compact binary object format.
    pub fn write_pickle<P, T>(&self, path: P, value: &T) -> Result<()>
    where
        P: AsRef<Path>,
        T: Serialize + ?Sized,
    {
        self.write_with(path, WriteMode::Truncate, &PickleCodec, value)
    }

    pub fn read_pickle<P: AsRef<Path>, T: DeserializeOwned>(&self, path: P) -> Result<T> {
        self.read_with(path, &PickleCodec)
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P, data: &CsvData) -> Result<()> {
        self.write_with(path, WriteMode::Truncate, &CsvCodec::default(), data)
    }

    pub fn read_csv<P: AsRef<Path>>(&self, path: P, shape: CsvShape) -> Result<CsvData> {
        self.read_with(path, &CsvCodec::new(shape))
    }

    /// The header row (if the file is not empty) and the data rows.
    pub fn read_csv_rows<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<(Option<Vec<String>>, Vec<Vec<String>>)> {
        Ok(self.read_csv(path, CsvShape::Rows)?.into_rows())
    }

    pub fn read_csv_records<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Record>> {
        Ok(self.read_csv(path, CsvShape::Records)?.into_records())
    }

    pub fn write_ini<P: AsRef<Path>>(&self, path: P, data: &IniData) -> Result<()> {
        self.write_with(path, WriteMode::Truncate, &IniCodec, data)
    }

    pub fn read_ini<P: AsRef<Path>>(&self, path: P) -> Result<IniData> {
        self.read_with(path, &IniCodec)
    }

    pub fn write_yaml<P, T>(&self, path: P, value: &T) -> Result<()>
    where
        P: AsRef<Path>,
        T: Serialize + ?Sized,
    {
        FileType::Yaml.ensure_available()?;
        self.write_with(path, WriteMode::Truncate, &YamlCodec, value)
    }

    pub fn read_yaml<P: AsRef<Path>, T: DeserializeOwned>(&self, path: P) -> Result<T> {
        FileType::Yaml.ensure_available()?;
        self.read_with(path, &YamlCodec)
    }

    /// Writes `value` in the format named by `file_type` (a `FileType` or its tag name).
    ///
    /// Binary, CSV and INI only hold bytes, records and string maps respectively; values of
    /// other shapes are rejected with `InvalidData`.
    pub fn write_as<P, T, F>(&self, path: P, file_type: F, value: &T) -> Result<()>
    where
        P: AsRef<Path>,
        T: Serialize + ?Sized,
        F: AsFileType,
    {
        let file_type = file_type.as_file_type()?;
        file_type.ensure_available()?;
        let host = self.to_host(path)?;
        write_guarded(&host, WriteMode::Truncate, |w| {
            encode_serde(file_type, w, value)
        })
    }

    /// Reads the file at `path` as the format named by `file_type`.
    pub fn read_as<P, T, F>(&self, path: P, file_type: F) -> Result<T>
    where
        P: AsRef<Path>,
        T: DeserializeOwned,
        F: AsFileType,
    {
        let file_type = file_type.as_file_type()?;
        file_type.ensure_available()?;
        let host = self.to_host(path)?;
        read_guarded(&host, |r| decode_serde(file_type, r))
    }
}

impl PathResolver for FastFS {
    fn resolve<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        self.root.resolve(path)
    }
}
