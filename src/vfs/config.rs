use std::path::{Path, PathBuf};

use crate::FsError;
use crate::codec::{Decoder, Encoder, IniCodec, IniData, Section};
use crate::core::Result;
use crate::vfs::guarded::{WriteMode, read_guarded, write_guarded};

/// Name of the configuration file, relative to the working directory.
pub const CONFIG_FILE_NAME: &str = ".fastfs";

/// Persisted virtual root settings.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualRootConfig {
    /// Directory relative paths are redirected into.
    pub directory: PathBuf,
    /// When `false`, resolution is the identity.
    pub active: bool,
}

impl VirtualRootConfig {
    pub fn new<P: AsRef<Path>>(directory: P, active: bool) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            active,
        }
    }

    /// Reads the configuration stored at `path`. A missing file is `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let data = match read_guarded(path, |r| IniCodec.decode(r)) {
            Ok(data) => data,
            Err(FsError::NotFound { .. }) => return Ok(None),
            Err(FsError::CorruptFile { cause, .. }) => {
                return Err(corrupt(path, cause.to_string()));
            }
            Err(e) => return Err(e),
        };

        let directory = match data.get(None, "directory") {
            Some(directory) if !directory.is_empty() => PathBuf::from(directory),
            Some(_) => return Err(corrupt(path, "the directory option is empty")),
            None => return Err(corrupt(path, "the directory option is missing")),
        };
        let active = match data.get(None, "active") {
            Some(value) => parse_bool(value).ok_or_else(|| {
                corrupt(path, format!("'{value}' is not a boolean value for option active"))
            })?,
            None => return Err(corrupt(path, "the active option is missing")),
        };

        Ok(Some(Self { directory, active }))
    }

    /// Overwrites the configuration file at `path`.
    pub fn store(&self, path: &Path) -> Result<()> {
        let mut options = Section::new();
        options.insert(
            "directory".to_string(),
            self.directory.to_string_lossy().into_owned(),
        );
        options.insert("active".to_string(), self.active.to_string());
        let data = IniData::Flat(options);

        write_guarded(path, WriteMode::Truncate, |w| IniCodec.encode(w, &data))
    }
}

fn corrupt(path: &Path, reason: impl Into<String>) -> FsError {
    FsError::CorruptConfig {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// The boolean spellings classic INI parsers accept.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}
